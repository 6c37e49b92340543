use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use super::scale::RadiusScale;

/// Sibling order fed to the packer; it decides where each bubble lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortMode {
    Descending,
    Ascending,
    /// Non-deterministic across runs unless the seed is pinned.
    Shuffled { seed: u64 },
}

impl SortMode {
    /// `"a"` sorts by descending amount, `"b"` keeps the ascending default,
    /// anything else shuffles with `seed` (or a freshly drawn one).
    pub fn from_param(param: &str, seed: Option<u64>) -> Self {
        match param {
            "a" => Self::Descending,
            "b" => Self::Ascending,
            _ => Self::Shuffled {
                seed: seed.unwrap_or_else(rand::random),
            },
        }
    }

    fn order(self, weights: &[f64]) -> Vec<usize> {
        let mut order = (0..weights.len()).collect::<Vec<_>>();
        match self {
            Self::Descending => order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a])),
            Self::Ascending => order.sort_by(|&a, &b| weights[a].total_cmp(&weights[b])),
            Self::Shuffled { seed } => order.shuffle(&mut StdRng::seed_from_u64(seed)),
        }
        order
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Circle {
    #[cfg(test)]
    pub fn contains(&self, other: &Circle, tolerance: f64) -> bool {
        let distance = (other.x - self.x).hypot(other.y - self.y);
        distance + other.r <= self.r + tolerance
    }

    #[cfg(test)]
    pub fn gap(&self, other: &Circle) -> f64 {
        (other.x - self.x).hypot(other.y - self.y) - self.r - other.r
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKey {
    Root,
    Leaf(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    pub key: NodeKey,
    pub circle: Circle,
    pub parent: Option<usize>,
}

impl LayoutNode {
    pub fn leaf_id(&self) -> Option<&str> {
        match &self.key {
            NodeKey::Leaf(id) => Some(id),
            _ => None,
        }
    }
}

/// One packing pass: the synthetic root at index 0 followed by its leaves.
/// Empty input yields no nodes at all.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PackLayout {
    nodes: Vec<LayoutNode>,
}

impl PackLayout {
    #[cfg(test)]
    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn root(&self) -> Option<&LayoutNode> {
        self.nodes.first()
    }

    pub fn leaves(&self) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.iter().filter(|node| node.parent.is_some())
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        for node in &mut self.nodes {
            node.circle.x += dx;
            node.circle.y += dy;
        }
    }

    /// Shrinks the whole pass about its root so the root diameter is at
    /// most `diameter`.
    pub(super) fn fit_within(&mut self, diameter: f64) {
        let Some(root) = self.root().map(|node| node.circle) else {
            return;
        };
        if root.r * 2.0 <= diameter || root.r <= 0.0 {
            return;
        }

        let k = diameter / (root.r * 2.0);
        for node in &mut self.nodes {
            node.circle.x = root.x + (node.circle.x - root.x) * k;
            node.circle.y = root.y + (node.circle.y - root.y) * k;
            node.circle.r *= k;
        }
    }
}

/// Circle packer. Sort mode and padding are fixed at construction.
#[derive(Clone, Copy, Debug)]
pub struct PackEngine {
    sort: SortMode,
    padding: f64,
}

impl PackEngine {
    pub const DEFAULT_PADDING: f64 = 2.0;

    pub fn new(sort: SortMode, padding: f64) -> Self {
        Self {
            sort,
            padding: padding.max(0.0),
        }
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort
    }

    /// Packs `items` as siblings under one synthetic root centred in a
    /// `width` x `height` canvas. Leaf radius is `scale.radius(weight(item))`
    /// and siblings keep `padding` between them.
    pub fn pack<T>(
        &self,
        items: &[T],
        key: impl Fn(&T) -> &str,
        weight: impl Fn(&T) -> f64,
        scale: &RadiusScale,
        width: f64,
        height: f64,
    ) -> PackLayout {
        if items.is_empty() {
            return PackLayout::default();
        }

        let weights = items.iter().map(&weight).collect::<Vec<_>>();
        let order = self.sort.order(&weights);
        let inflate = self.padding / 2.0;

        let mut circles = order
            .iter()
            .map(|&index| Circle {
                x: 0.0,
                y: 0.0,
                r: scale.radius(weights[index]) + inflate,
            })
            .collect::<Vec<_>>();
        let enclosing = pack_siblings(&mut circles);

        let center_x = width / 2.0;
        let center_y = height / 2.0;
        let mut nodes = Vec::with_capacity(items.len() + 1);
        nodes.push(LayoutNode {
            key: NodeKey::Root,
            circle: Circle {
                x: center_x,
                y: center_y,
                r: enclosing - inflate,
            },
            parent: None,
        });
        for (circle, &index) in circles.iter().zip(order.iter()) {
            nodes.push(LayoutNode {
                key: NodeKey::Leaf(key(&items[index]).to_owned()),
                circle: Circle {
                    x: center_x + circle.x,
                    y: center_y + circle.y,
                    r: circle.r - inflate,
                },
                parent: Some(0),
            });
        }

        debug!(
            leaves = items.len(),
            root_radius = enclosing - inflate,
            sort = ?self.sort,
            "packed circles"
        );
        PackLayout { nodes }
    }
}

/// Places `c` tangent to both `a` and `b`.
fn place(b: Circle, a: Circle, c: &mut Circle) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d2 = dx * dx + dy * dy;
    if d2 > 0.0 {
        let a2 = (a.r + c.r).powi(2);
        let b2 = (b.r + c.r).powi(2);
        if a2 > b2 {
            let x = (d2 + b2 - a2) / (2.0 * d2);
            let y = (b2 / d2 - x * x).max(0.0).sqrt();
            c.x = b.x - x * dx - y * dy;
            c.y = b.y - x * dy + y * dx;
        } else {
            let x = (d2 + a2 - b2) / (2.0 * d2);
            let y = (a2 / d2 - x * x).max(0.0).sqrt();
            c.x = a.x + x * dx - y * dy;
            c.y = a.y + x * dy + y * dx;
        }
    } else {
        c.x = a.x + c.r;
        c.y = a.y;
    }
}

fn intersects(a: Circle, b: Circle) -> bool {
    let dr = a.r + b.r - 1e-6;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

/// Squared distance from the origin to the weighted midpoint of `a` and `b`.
fn score(a: Circle, b: Circle) -> f64 {
    let ab = a.r + b.r;
    if ab <= 0.0 {
        return a.x * a.x + a.y * a.y;
    }
    let dx = (a.x * b.r + b.x * a.r) / ab;
    let dy = (a.y * b.r + b.y * a.r) / ab;
    dx * dx + dy * dy
}

/// Front-chain sibling packing. Circles are placed in slice order, each one
/// tangent to a pair on the current front chain, then the whole set is
/// centred on its bounding box. Returns the radius of a circle around the
/// origin enclosing every sibling.
pub fn pack_siblings(circles: &mut [Circle]) -> f64 {
    let n = circles.len();
    if n == 0 {
        return 0.0;
    }

    circles[0].x = 0.0;
    circles[0].y = 0.0;
    if n > 1 {
        circles[0].x = -circles[1].r;
        circles[1].x = circles[0].r;
        circles[1].y = 0.0;
    }

    if n > 2 {
        let (first, second) = (circles[0], circles[1]);
        place(second, first, &mut circles[2]);

        // Circular doubly linked front chain, seeded with the first three.
        let mut next = vec![0usize; n];
        let mut prev = vec![0usize; n];
        next[0] = 1;
        prev[1] = 0;
        next[1] = 2;
        prev[2] = 1;
        next[2] = 0;
        prev[0] = 2;

        let mut a = 0usize;
        let mut b = 1usize;
        let mut i = 3usize;

        'pack: while i < n {
            let (ca, cb) = (circles[a], circles[b]);
            place(ca, cb, &mut circles[i]);
            let c = circles[i];

            // Nearest intersecting circle along the chain, looking both ways.
            let mut j = next[b];
            let mut k = prev[a];
            let mut sj = circles[b].r;
            let mut sk = circles[a].r;
            loop {
                if sj <= sk {
                    if intersects(circles[j], c) {
                        b = j;
                        next[a] = b;
                        prev[b] = a;
                        continue 'pack;
                    }
                    sj += circles[j].r;
                    j = next[j];
                } else {
                    if intersects(circles[k], c) {
                        a = k;
                        next[a] = b;
                        prev[b] = a;
                        continue 'pack;
                    }
                    sk += circles[k].r;
                    k = prev[k];
                }
                if j == next[k] {
                    break;
                }
            }

            prev[i] = a;
            next[i] = b;
            next[a] = i;
            prev[b] = i;
            b = i;

            let mut best = score(circles[a], circles[next[a]]);
            let mut cursor = next[b];
            while cursor != b {
                let candidate = score(circles[cursor], circles[next[cursor]]);
                if candidate < best {
                    a = cursor;
                    best = candidate;
                }
                cursor = next[cursor];
            }
            b = next[a];
            i += 1;
        }
    }

    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for circle in circles.iter() {
        min_x = min_x.min(circle.x - circle.r);
        max_x = max_x.max(circle.x + circle.r);
        min_y = min_y.min(circle.y - circle.r);
        max_y = max_y.max(circle.y + circle.r);
    }
    let center_x = (min_x + max_x) / 2.0;
    let center_y = (min_y + max_y) / 2.0;

    let mut enclosing = 0.0f64;
    for circle in circles.iter_mut() {
        circle.x -= center_x;
        circle.y -= center_y;
        enclosing = enclosing.max(circle.r + circle.x.hypot(circle.y));
    }
    enclosing
}
