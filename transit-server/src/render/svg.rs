//! Minimal SVG document assembly.
//!
//! Just enough of SVG for the schematic map: polylines, circles and text
//! with an optional stroke underlayer. Shapes render themselves through
//! `Display` and a `Document` wraps them in the `<svg>` envelope.

use std::fmt::{self, Write as _};

/// A point in document coordinates (pixels, y down).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An SVG color.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Color {
    /// The literal `none`.
    #[default]
    None,
    /// A named color such as `white` or `red`.
    Named(String),
    Rgb {
        r: u8,
        g: u8,
        b: u8,
    },
    Rgba {
        r: u8,
        g: u8,
        b: u8,
        opacity: f64,
    },
}

impl Color {
    pub fn named(name: &str) -> Self {
        Color::Named(name.to_string())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::None => f.write_str("none"),
            Color::Named(name) => f.write_str(name),
            Color::Rgb { r, g, b } => write!(f, "rgb({r},{g},{b})"),
            Color::Rgba { r, g, b, opacity } => write!(f, "rgba({r},{g},{b},{opacity})"),
        }
    }
}

/// A stroked polyline, as used for route lines.
#[derive(Debug, Clone, Default)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
    /// Round caps and joins, for smooth corners at stops.
    pub round_joins: bool,
}

impl fmt::Display for Polyline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<polyline points=\"")?;
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 {
                f.write_char(' ')?;
            }
            write!(f, "{},{}", point.x, point.y)?;
        }
        write!(
            f,
            "\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"",
            self.fill, self.stroke, self.stroke_width
        )?;
        if self.round_joins {
            f.write_str(" stroke-linecap=\"round\" stroke-linejoin=\"round\"")?;
        }
        f.write_str("/>")
    }
}

/// A filled circle, as used for stop markers.
#[derive(Debug, Clone, Default)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
    pub fill: Color,
}

impl fmt::Display for Circle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>",
            self.center.x, self.center.y, self.radius, self.fill
        )
    }
}

/// A text label. With a stroke set it becomes an underlayer: the same
/// glyphs drawn fat and round-joined behind the real text.
#[derive(Debug, Clone, Default)]
pub struct Text {
    pub position: Point,
    pub offset: Point,
    pub font_size: u32,
    pub font_family: Option<String>,
    pub font_weight: Option<String>,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: Option<f64>,
    pub content: String,
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<text x=\"{}\" y=\"{}\" dx=\"{}\" dy=\"{}\" font-size=\"{}\"",
            self.position.x, self.position.y, self.offset.x, self.offset.y, self.font_size
        )?;
        if let Some(family) = &self.font_family {
            write!(f, " font-family=\"{family}\"")?;
        }
        if let Some(weight) = &self.font_weight {
            write!(f, " font-weight=\"{weight}\"")?;
        }
        if let Some(fill) = &self.fill {
            write!(f, " fill=\"{fill}\"")?;
        }
        if let Some(stroke) = &self.stroke {
            write!(f, " stroke=\"{stroke}\"")?;
            if let Some(width) = self.stroke_width {
                write!(f, " stroke-width=\"{width}\"")?;
            }
            f.write_str(" stroke-linecap=\"round\" stroke-linejoin=\"round\"")?;
        }
        write!(f, ">{}</text>", escape(&self.content))
    }
}

/// Any drawable shape.
#[derive(Debug, Clone)]
pub enum Shape {
    Polyline(Polyline),
    Circle(Circle),
    Text(Text),
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Polyline(shape) => shape.fmt(f),
            Shape::Circle(shape) => shape.fmt(f),
            Shape::Text(shape) => shape.fmt(f),
        }
    }
}

impl From<Polyline> for Shape {
    fn from(shape: Polyline) -> Self {
        Shape::Polyline(shape)
    }
}

impl From<Circle> for Shape {
    fn from(shape: Circle) -> Self {
        Shape::Circle(shape)
    }
}

impl From<Text> for Shape {
    fn from(shape: Text) -> Self {
        Shape::Text(shape)
    }
}

/// An SVG document: shapes are rendered in insertion order, so later
/// shapes draw on top of earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Document {
    shapes: Vec<Shape>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, shape: impl Into<Shape>) {
        self.shapes.push(shape.into());
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n");
        out.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\">\n");
        for shape in &self.shapes {
            // Writing to a String cannot fail.
            let _ = writeln!(out, "  {shape}");
        }
        out.push_str("</svg>");
        out
    }
}

/// Escape the five XML-special characters in text content.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_display() {
        assert_eq!(Color::None.to_string(), "none");
        assert_eq!(Color::named("white").to_string(), "white");
        assert_eq!(Color::Rgb { r: 1, g: 2, b: 3 }.to_string(), "rgb(1,2,3)");
        assert_eq!(
            Color::Rgba {
                r: 255,
                g: 0,
                b: 0,
                opacity: 0.5
            }
            .to_string(),
            "rgba(255,0,0,0.5)"
        );
    }

    #[test]
    fn polyline_markup() {
        let line = Polyline {
            points: vec![Point::new(10.0, 20.0), Point::new(30.5, 40.0)],
            fill: Color::None,
            stroke: Color::named("green"),
            stroke_width: 14.0,
            round_joins: true,
        };
        assert_eq!(
            line.to_string(),
            "<polyline points=\"10,20 30.5,40\" fill=\"none\" stroke=\"green\" \
             stroke-width=\"14\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>"
        );
    }

    #[test]
    fn circle_markup() {
        let circle = Circle {
            center: Point::new(5.0, 6.0),
            radius: 3.0,
            fill: Color::named("white"),
        };
        assert_eq!(
            circle.to_string(),
            "<circle cx=\"5\" cy=\"6\" r=\"3\" fill=\"white\"/>"
        );
    }

    #[test]
    fn text_escapes_content() {
        let text = Text {
            position: Point::new(0.0, 0.0),
            font_size: 12,
            fill: Some(Color::named("black")),
            content: "Fish & <Chips>".to_string(),
            ..Text::default()
        };
        let markup = text.to_string();
        assert!(markup.contains("Fish &amp; &lt;Chips&gt;"), "{markup}");
    }

    #[test]
    fn underlayer_text_gets_round_stroke() {
        let text = Text {
            font_size: 12,
            stroke: Some(Color::named("white")),
            stroke_width: Some(3.0),
            content: "label".to_string(),
            ..Text::default()
        };
        let markup = text.to_string();
        assert!(markup.contains("stroke=\"white\""));
        assert!(markup.contains("stroke-width=\"3\""));
        assert!(markup.contains("stroke-linecap=\"round\""));
    }

    #[test]
    fn document_envelope() {
        let mut document = Document::new();
        document.add(Circle::default());
        let svg = document.render();

        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>"));
        assert!(svg.contains("<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\">"));
        assert!(svg.contains("<circle"));
        assert!(svg.ends_with("</svg>"));
    }
}
