use serde::{Deserialize, Serialize};

use crate::scale::Viewport;

/// Pixel distance within which a click counts as touching a stroke.
pub const HIT_TOLERANCE: f32 = 6.0;
/// Normalized band around an ellipse boundary that still counts as a hit.
pub const ELLIPSE_TOLERANCE: f32 = 0.2;
/// Half of the fixed square a symbol marker occupies.
pub const SYMBOL_HALF_SIZE: f32 = 8.0;
/// Approximate glyph advance used for text annotation hit boxes.
pub const TEXT_CHAR_WIDTH: f32 = 7.0;
pub const TEXT_LINE_HEIGHT: f32 = 14.0;

/// An annotation anchor in domain coordinates. Shapes store these, never
/// pixels, so they stay put across pan and zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub time: u64,
    pub price: f32,
}

/// Which annotation tool the pointer currently drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolMode {
    #[default]
    None,
    Select,
    Line,
    Arrow,
    Rectangle,
    Circle,
    Triangle,
    Angle,
    Polyline,
    Symbol,
    Text,
}

impl ToolMode {
    pub const ALL: [ToolMode; 11] = [
        ToolMode::None,
        ToolMode::Select,
        ToolMode::Line,
        ToolMode::Arrow,
        ToolMode::Rectangle,
        ToolMode::Circle,
        ToolMode::Triangle,
        ToolMode::Angle,
        ToolMode::Polyline,
        ToolMode::Symbol,
        ToolMode::Text,
    ];

    /// True for modes where a pointer drag sketches a new shape.
    pub fn is_drawing(&self) -> bool {
        !matches!(self, ToolMode::None | ToolMode::Select)
    }
}

impl std::fmt::Display for ToolMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ToolMode::None => "Pan",
            ToolMode::Select => "Select",
            ToolMode::Line => "Line",
            ToolMode::Arrow => "Arrow",
            ToolMode::Rectangle => "Rectangle",
            ToolMode::Circle => "Circle",
            ToolMode::Triangle => "Triangle",
            ToolMode::Angle => "Angle",
            ToolMode::Polyline => "Polyline",
            ToolMode::Symbol => "Symbol",
            ToolMode::Text => "Text",
        };
        write!(f, "{name}")
    }
}

/// A committed annotation. One variant per tool, each carrying its own
/// typed geometry; the circle tool produces the two-point [`Shape::Ellipse`]
/// since that is what the drag gesture defines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Line { start: ChartPoint, end: ChartPoint },
    Arrow { start: ChartPoint, end: ChartPoint },
    Rectangle { a: ChartPoint, b: ChartPoint },
    Ellipse { a: ChartPoint, b: ChartPoint },
    Triangle { a: ChartPoint, b: ChartPoint, c: ChartPoint },
    /// Vertex plus one free ray; the second ray is the horizontal
    /// reference from the vertex toward the free ray's side.
    Angle { vertex: ChartPoint, through: ChartPoint },
    Polyline { points: Vec<ChartPoint> },
    Symbol { at: ChartPoint },
    Text { at: ChartPoint, content: String },
}

impl Shape {
    /// The one factory mapping a drag gesture `{mode, start, end}` to a
    /// concrete shape. Non-drawing modes produce nothing.
    pub fn create(mode: ToolMode, start: ChartPoint, end: ChartPoint) -> Option<Shape> {
        let shape = match mode {
            ToolMode::None | ToolMode::Select => return None,
            ToolMode::Line => Shape::Line { start, end },
            ToolMode::Arrow => Shape::Arrow { start, end },
            ToolMode::Rectangle => Shape::Rectangle { a: start, b: end },
            ToolMode::Circle => Shape::Ellipse { a: start, b: end },
            ToolMode::Triangle => {
                // Isoceles: apex above the drag midpoint at the start
                // price, base corners at the end price.
                let apex = ChartPoint {
                    time: start.time.midpoint(end.time),
                    price: start.price,
                };
                Shape::Triangle {
                    a: apex,
                    b: ChartPoint { time: start.time, price: end.price },
                    c: ChartPoint { time: end.time, price: end.price },
                }
            }
            ToolMode::Angle => Shape::Angle { vertex: start, through: end },
            ToolMode::Polyline => Shape::Polyline { points: vec![start, end] },
            ToolMode::Symbol => Shape::Symbol { at: end },
            ToolMode::Text => Shape::Text { at: end, content: "Text".to_string() },
        };
        Some(shape)
    }

    /// Anchor points in insertion order, used for selection handles.
    pub fn points(&self) -> Vec<ChartPoint> {
        match self {
            Shape::Line { start, end } | Shape::Arrow { start, end } => vec![*start, *end],
            Shape::Rectangle { a, b } | Shape::Ellipse { a, b } => vec![*a, *b],
            Shape::Triangle { a, b, c } => vec![*a, *b, *c],
            Shape::Angle { vertex, through } => vec![*vertex, *through],
            Shape::Polyline { points } => points.clone(),
            Shape::Symbol { at } => vec![*at],
            Shape::Text { at, .. } => vec![*at],
        }
    }

    /// Replaces the anchor at `index`; out-of-range indices are ignored.
    pub fn set_point(&mut self, index: usize, point: ChartPoint) {
        let mut points = self.points();
        if let Some(slot) = points.get_mut(index) {
            *slot = point;
            self.set_points(points);
        }
    }

    /// Moves the trailing anchor, the live endpoint while dragging.
    pub fn update_last(&mut self, point: ChartPoint) {
        let count = self.points().len();
        if count > 0 {
            self.set_point(count - 1, point);
        }
    }

    /// Appends an anchor where the geometry is open-ended; fixed-arity
    /// shapes ignore it.
    pub fn push_point(&mut self, point: ChartPoint) {
        if let Shape::Polyline { points } = self {
            points.push(point);
        }
    }

    /// Rewrites all anchors from `points`, keeping each variant's arity.
    /// Missing entries leave the existing anchor untouched.
    pub fn set_points(&mut self, points: Vec<ChartPoint>) {
        let mut it = points.into_iter();
        match self {
            Shape::Line { start, end } | Shape::Arrow { start, end } => {
                if let Some(p) = it.next() { *start = p; }
                if let Some(p) = it.next() { *end = p; }
            }
            Shape::Rectangle { a, b } | Shape::Ellipse { a, b } => {
                if let Some(p) = it.next() { *a = p; }
                if let Some(p) = it.next() { *b = p; }
            }
            Shape::Triangle { a, b, c } => {
                if let Some(p) = it.next() { *a = p; }
                if let Some(p) = it.next() { *b = p; }
                if let Some(p) = it.next() { *c = p; }
            }
            Shape::Angle { vertex, through } => {
                if let Some(p) = it.next() { *vertex = p; }
                if let Some(p) = it.next() { *through = p; }
            }
            Shape::Polyline { points } => *points = it.collect(),
            Shape::Symbol { at } | Shape::Text { at, .. } => {
                if let Some(p) = it.next() { *at = p; }
            }
        }
    }

    /// Whether the pixel `(x, y)` touches this shape under `view`.
    pub fn is_hit(&self, x: f32, y: f32, view: &Viewport) -> bool {
        let px = |p: &ChartPoint| (view.x(p.time), view.y(p.price));

        match self {
            Shape::Line { start, end } | Shape::Arrow { start, end } => {
                let (ax, ay) = px(start);
                let (bx, by) = px(end);
                dist_to_segment(x, y, ax, ay, bx, by) <= HIT_TOLERANCE
            }
            Shape::Rectangle { a, b } => {
                let (ax, ay) = px(a);
                let (bx, by) = px(b);
                let (left, right) = (ax.min(bx), ax.max(bx));
                let (top, bottom) = (ay.min(by), ay.max(by));
                x >= left && x <= right && y >= top && y <= bottom
            }
            Shape::Ellipse { a, b } => {
                let (ax, ay) = px(a);
                let (bx, by) = px(b);
                let (cx, cy) = ((ax + bx) / 2.0, (ay + by) / 2.0);
                let (rx, ry) = ((ax - bx).abs() / 2.0, (ay - by).abs() / 2.0);

                // A collapsed axis degenerates the normalized form; test
                // the defining segment instead.
                if rx < 1.0 || ry < 1.0 {
                    return dist_to_segment(x, y, ax, ay, bx, by) <= HIT_TOLERANCE;
                }

                let norm = ((x - cx) / rx).powi(2) + ((y - cy) / ry).powi(2);
                (norm - 1.0).abs() <= ELLIPSE_TOLERANCE
            }
            Shape::Triangle { a, b, c } => {
                let (ax, ay) = px(a);
                let (bx, by) = px(b);
                let (cx, cy) = px(c);
                dist_to_segment(x, y, ax, ay, bx, by) <= HIT_TOLERANCE
                    || dist_to_segment(x, y, bx, by, cx, cy) <= HIT_TOLERANCE
                    || dist_to_segment(x, y, cx, cy, ax, ay) <= HIT_TOLERANCE
            }
            Shape::Angle { vertex, through } => {
                let (vx, vy) = px(vertex);
                let (tx, ty) = px(through);
                let reach = (tx - vx).hypot(ty - vy);
                let hx = vx + reach * (tx - vx).signum();

                dist_to_segment(x, y, vx, vy, tx, ty) <= HIT_TOLERANCE
                    || dist_to_segment(x, y, vx, vy, hx, vy) <= HIT_TOLERANCE
            }
            Shape::Polyline { points } => points.windows(2).any(|pair| {
                let (ax, ay) = px(&pair[0]);
                let (bx, by) = px(&pair[1]);
                dist_to_segment(x, y, ax, ay, bx, by) <= HIT_TOLERANCE
            }),
            Shape::Symbol { at } => {
                let (cx, cy) = px(at);
                (x - cx).abs() <= SYMBOL_HALF_SIZE && (y - cy).abs() <= SYMBOL_HALF_SIZE
            }
            Shape::Text { at, content } => {
                let (ax, ay) = px(at);
                let width = content.chars().count() as f32 * TEXT_CHAR_WIDTH;
                x >= ax && x <= ax + width && y >= ay && y <= ay + TEXT_LINE_HEIGHT
            }
        }
    }
}

/// A shape in the committed collection, with an optional per-drawing
/// stroke override as a `#rrggbb(aa)` hex string. The collection's
/// insertion order is the z-order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub shape: Shape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Drawing {
    pub fn new(shape: Shape) -> Self {
        Self { shape, color: None }
    }
}

/// Index of the topmost drawing under `(x, y)`. Later drawings paint on
/// top, so the scan runs in reverse insertion order and the first hit
/// wins.
pub fn hit_shape(drawings: &[Drawing], x: f32, y: f32, view: &Viewport) -> Option<usize> {
    drawings
        .iter()
        .enumerate()
        .rev()
        .find(|(_, drawing)| drawing.shape.is_hit(x, y, view))
        .map(|(index, _)| index)
}

/// Distance from `(px, py)` to the segment `(ax, ay)..(bx, by)` via the
/// clamped projection onto the segment.
pub fn dist_to_segment(px: f32, py: f32, ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let (dx, dy) = (bx - ax, by - ay);
    let len_sq = dx * dx + dy * dy;

    let t = if len_sq > 0.0 {
        (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let (nx, ny) = (ax + t * dx, ay + t * dy);
    (px - nx).hypot(py - ny)
}
