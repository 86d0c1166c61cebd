//! Schematic SVG map of the network.
//!
//! Stops are projected from the sphere onto the canvas, then the layers are
//! drawn in a fixed order: route lines, bus name labels, stop circles, stop
//! name labels. Only stops with through traffic and known coordinates
//! appear; a stop that exists solely through distance data has no position
//! to draw.

pub mod svg;

use serde::{Deserialize, Deserializer, de};

use crate::catalogue::TransitCatalogue;
use crate::domain::{BusId, StopId};
use crate::geo::Coordinates;

use svg::{Circle, Color, Document, Point, Polyline, Text};

/// Rendering options, usually taken from the dataset's `render_settings`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Canvas size in pixels.
    pub width: f64,
    pub height: f64,

    /// Gap between the drawing and the document border.
    pub padding: f64,

    pub line_width: f64,
    pub stop_radius: f64,

    pub bus_label_font_size: u32,
    pub bus_label_offset: (f64, f64),
    pub stop_label_font_size: u32,
    pub stop_label_offset: (f64, f64),

    /// Background halo drawn behind every label.
    pub underlayer_color: Color,
    pub underlayer_width: f64,

    /// Route line colors, cycled over the buses in name order.
    pub color_palette: Vec<Color>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
            padding: 50.0,
            line_width: 10.0,
            stop_radius: 30.0,
            bus_label_font_size: 20,
            bus_label_offset: (5.0, 5.0),
            stop_label_font_size: 20,
            stop_label_offset: (5.0, 5.0),
            underlayer_color: Color::named("white"),
            underlayer_width: 5.0,
            color_palette: vec![Color::named("black"), Color::named("red")],
        }
    }
}

/// Colors arrive as a name string, `[r, g, b]` or `[r, g, b, opacity]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Named(String),
    Channels(Vec<f64>),
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match ColorRepr::deserialize(deserializer)? {
            ColorRepr::Named(name) => Ok(Color::Named(name)),
            ColorRepr::Channels(channels) => match channels.as_slice() {
                [r, g, b] => Ok(Color::Rgb {
                    r: *r as u8,
                    g: *g as u8,
                    b: *b as u8,
                }),
                [r, g, b, opacity] => Ok(Color::Rgba {
                    r: *r as u8,
                    g: *g as u8,
                    b: *b as u8,
                    opacity: *opacity,
                }),
                _ => Err(de::Error::custom("color array must have 3 or 4 components")),
            },
        }
    }
}

const EPSILON: f64 = 1e-6;

/// Projection of geographic coordinates onto the canvas.
///
/// Zoom is chosen so the stop bounding box fits the canvas minus padding;
/// when all stops share a latitude or longitude the surviving axis decides,
/// and a single point degenerates to zoom 0 (everything at the padding
/// corner). The y axis flips because SVG grows downward.
#[derive(Debug, Clone, Copy)]
struct SphereProjector {
    padding: f64,
    min_lng: f64,
    max_lat: f64,
    zoom: f64,
}

impl SphereProjector {
    fn new(points: &[Coordinates], width: f64, height: f64, padding: f64) -> Self {
        let mut projector = Self {
            padding,
            min_lng: 0.0,
            max_lat: 0.0,
            zoom: 0.0,
        };
        if points.is_empty() {
            return projector;
        }

        let min_lng = points.iter().map(|p| p.lng).fold(f64::INFINITY, f64::min);
        let max_lng = points
            .iter()
            .map(|p| p.lng)
            .fold(f64::NEG_INFINITY, f64::max);
        let min_lat = points.iter().map(|p| p.lat).fold(f64::INFINITY, f64::min);
        let max_lat = points
            .iter()
            .map(|p| p.lat)
            .fold(f64::NEG_INFINITY, f64::max);

        let width_zoom = if max_lng - min_lng > EPSILON {
            Some((width - 2.0 * padding) / (max_lng - min_lng))
        } else {
            None
        };
        let height_zoom = if max_lat - min_lat > EPSILON {
            Some((height - 2.0 * padding) / (max_lat - min_lat))
        } else {
            None
        };

        projector.min_lng = min_lng;
        projector.max_lat = max_lat;
        projector.zoom = match (width_zoom, height_zoom) {
            (Some(w), Some(h)) => w.min(h),
            (Some(w), None) => w,
            (None, Some(h)) => h,
            (None, None) => 0.0,
        };
        projector
    }

    fn project(&self, coordinates: Coordinates) -> Point {
        Point::new(
            (coordinates.lng - self.min_lng) * self.zoom + self.padding,
            (self.max_lat - coordinates.lat) * self.zoom + self.padding,
        )
    }
}

/// Draws the catalogue as a schematic SVG map.
#[derive(Debug, Clone)]
pub struct MapRenderer {
    settings: RenderSettings,
}

impl MapRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Render the whole network into an SVG string.
    pub fn render(&self, catalogue: &TransitCatalogue) -> String {
        let stops: Vec<(StopId, Coordinates)> = catalogue
            .stops_with_service()
            .into_iter()
            .filter_map(|id| Some((id, catalogue.stop(id).coordinates?)))
            .collect();
        let points: Vec<Coordinates> = stops.iter().map(|&(_, c)| c).collect();
        let projector = SphereProjector::new(
            &points,
            self.settings.width,
            self.settings.height,
            self.settings.padding,
        );

        let buses: Vec<BusId> = catalogue
            .all_buses()
            .into_iter()
            .filter(|&bus| !catalogue.bus(bus).route.is_empty())
            .collect();

        let mut document = Document::new();
        self.draw_route_lines(&mut document, catalogue, &buses, &projector);
        self.draw_bus_labels(&mut document, catalogue, &buses, &projector);
        self.draw_stop_circles(&mut document, &stops, &projector);
        self.draw_stop_labels(&mut document, catalogue, &stops, &projector);
        document.render()
    }

    /// Color for the `index`-th drawn bus, cycling through the palette.
    fn line_color(&self, index: usize) -> Color {
        if self.settings.color_palette.is_empty() {
            return Color::named("black");
        }
        self.settings.color_palette[index % self.settings.color_palette.len()].clone()
    }

    fn draw_route_lines(
        &self,
        document: &mut Document,
        catalogue: &TransitCatalogue,
        buses: &[BusId],
        projector: &SphereProjector,
    ) {
        for (index, &bus) in buses.iter().enumerate() {
            let points: Vec<Point> = catalogue
                .bus(bus)
                .route
                .iter()
                .filter_map(|&stop| catalogue.stop(stop).coordinates)
                .map(|c| projector.project(c))
                .collect();
            document.add(Polyline {
                points,
                fill: Color::None,
                stroke: self.line_color(index),
                stroke_width: self.settings.line_width,
                round_joins: true,
            });
        }
    }

    fn draw_bus_labels(
        &self,
        document: &mut Document,
        catalogue: &TransitCatalogue,
        buses: &[BusId],
        projector: &SphereProjector,
    ) {
        for (index, &bus) in buses.iter().enumerate() {
            let bus_data = catalogue.bus(bus);
            let mut label_stops = vec![bus_data.route[0]];
            if !bus_data.is_roundtrip {
                let turnaround = bus_data.route[bus_data.route.len() / 2];
                if turnaround != bus_data.route[0] {
                    label_stops.push(turnaround);
                }
            }

            for stop in label_stops {
                let Some(coordinates) = catalogue.stop(stop).coordinates else {
                    continue;
                };
                let position = projector.project(coordinates);
                let (underlayer, text) = self.label_pair(
                    bus_data.name.clone(),
                    position,
                    self.settings.bus_label_offset,
                    self.settings.bus_label_font_size,
                    Some("bold".to_string()),
                    self.line_color(index),
                );
                document.add(underlayer);
                document.add(text);
            }
        }
    }

    fn draw_stop_circles(
        &self,
        document: &mut Document,
        stops: &[(StopId, Coordinates)],
        projector: &SphereProjector,
    ) {
        for &(_, coordinates) in stops {
            document.add(Circle {
                center: projector.project(coordinates),
                radius: self.settings.stop_radius,
                fill: Color::named("white"),
            });
        }
    }

    fn draw_stop_labels(
        &self,
        document: &mut Document,
        catalogue: &TransitCatalogue,
        stops: &[(StopId, Coordinates)],
        projector: &SphereProjector,
    ) {
        for &(stop, coordinates) in stops {
            let (underlayer, text) = self.label_pair(
                catalogue.stop_name(stop).to_string(),
                projector.project(coordinates),
                self.settings.stop_label_offset,
                self.settings.stop_label_font_size,
                None,
                Color::named("black"),
            );
            document.add(underlayer);
            document.add(text);
        }
    }

    /// A label and the underlayer drawn behind it.
    fn label_pair(
        &self,
        content: String,
        position: Point,
        offset: (f64, f64),
        font_size: u32,
        font_weight: Option<String>,
        fill: Color,
    ) -> (Text, Text) {
        let base = Text {
            position,
            offset: Point::new(offset.0, offset.1),
            font_size,
            font_family: Some("Verdana".to_string()),
            font_weight,
            content,
            ..Text::default()
        };
        let underlayer = Text {
            fill: Some(self.settings.underlayer_color.clone()),
            stroke: Some(self.settings.underlayer_color.clone()),
            stroke_width: Some(self.settings.underlayer_width),
            ..base.clone()
        };
        let text = Text {
            fill: Some(fill),
            ..base
        };
        (underlayer, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(lat: f64, lng: f64) -> Coordinates {
        Coordinates::new(lat, lng)
    }

    #[test]
    fn projector_fits_the_bounding_box() {
        let points = [coords(0.0, 0.0), coords(1.0, 2.0)];
        let projector = SphereProjector::new(&points, 210.0, 110.0, 5.0);

        // width zoom = 200/2 = 100, height zoom = 100/1 = 100.
        let bottom_left = projector.project(coords(0.0, 0.0));
        assert_eq!((bottom_left.x, bottom_left.y), (5.0, 105.0));

        let top_right = projector.project(coords(1.0, 2.0));
        assert_eq!((top_right.x, top_right.y), (205.0, 5.0));
    }

    #[test]
    fn projector_single_point_degenerates_to_padding() {
        let points = [coords(55.0, 37.0)];
        let projector = SphereProjector::new(&points, 100.0, 100.0, 10.0);

        let point = projector.project(coords(55.0, 37.0));
        assert_eq!((point.x, point.y), (10.0, 10.0));
    }

    #[test]
    fn projector_flat_line_uses_surviving_axis() {
        // All stops on one latitude: only the width zoom exists.
        let points = [coords(10.0, 0.0), coords(10.0, 4.0)];
        let projector = SphereProjector::new(&points, 100.0, 100.0, 10.0);

        let right = projector.project(coords(10.0, 4.0));
        assert_eq!((right.x, right.y), (90.0, 10.0));
    }

    fn small_catalogue() -> TransitCatalogue {
        let mut catalogue = TransitCatalogue::new();
        catalogue.add_stop_with_distances("Harbor", coords(0.0, 0.0), [("Hill", 1000)]);
        catalogue.add_stop("Hill", coords(0.5, 0.5));
        catalogue.add_bus("5", ["Harbor", "Hill", "Harbor"], true);
        catalogue
    }

    #[test]
    fn renders_routes_stops_and_labels() {
        let renderer = MapRenderer::new(RenderSettings::default());
        let svg = renderer.render(&small_catalogue());

        assert!(svg.starts_with("<?xml"));
        assert_eq!(svg.matches("<polyline").count(), 1);
        assert_eq!(svg.matches("<circle").count(), 2);
        // One bus label pair plus two stop label pairs.
        assert_eq!(svg.matches("<text").count(), 6);
        assert!(svg.contains("Harbor"));
        assert!(svg.contains("Hill"));
    }

    #[test]
    fn linear_bus_is_labelled_at_both_ends() {
        let mut catalogue = TransitCatalogue::new();
        catalogue.add_stop_with_distances("West", coords(0.0, 0.0), [("East", 1000)]);
        catalogue.add_stop("East", coords(0.0, 1.0));
        catalogue.add_bus("L", ["West", "East"], false);

        let renderer = MapRenderer::new(RenderSettings::default());
        let svg = renderer.render(&catalogue);

        // Bus label at origin and turnaround: two pairs, plus two stop pairs.
        assert_eq!(svg.matches("<text").count(), 8);
    }

    #[test]
    fn coordinate_less_stops_are_not_drawn() {
        let mut catalogue = TransitCatalogue::new();
        catalogue.add_stop_with_distances("Known", coords(0.0, 0.0), [("Phantom", 1000)]);
        // "Phantom" exists only through distance data, yet carries traffic.
        catalogue.add_bus("7", ["Known", "Phantom", "Known"], true);

        let renderer = MapRenderer::new(RenderSettings::default());
        let svg = renderer.render(&catalogue);

        assert_eq!(svg.matches("<circle").count(), 1);
        assert!(!svg.contains("Phantom"));
    }

    #[test]
    fn settings_deserialize_all_color_forms() {
        let json = r#"{
            "width": 600,
            "height": 400,
            "padding": 30,
            "underlayer_color": [255, 255, 255, 0.85],
            "color_palette": ["green", [255, 160, 0], [128, 0, 128, 0.5]]
        }"#;
        let settings: RenderSettings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.width, 600.0);
        assert_eq!(settings.height, 400.0);
        assert_eq!(settings.padding, 30.0);
        assert_eq!(
            settings.underlayer_color,
            Color::Rgba {
                r: 255,
                g: 255,
                b: 255,
                opacity: 0.85
            }
        );
        assert_eq!(settings.color_palette.len(), 3);
        assert_eq!(settings.color_palette[0], Color::named("green"));
        assert_eq!(settings.color_palette[1], Color::Rgb { r: 255, g: 160, b: 0 });
        // Unlisted fields keep their defaults.
        assert_eq!(settings.line_width, RenderSettings::default().line_width);
    }

    #[test]
    fn bad_color_arrays_are_rejected() {
        assert!(serde_json::from_str::<Color>("[1, 2]").is_err());
        assert!(serde_json::from_str::<Color>("[1, 2, 3, 4, 5]").is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Projected points never leave the padded canvas.
        #[test]
        fn projection_stays_on_canvas(
            lats in proptest::collection::vec(-80.0..80.0f64, 1..20),
            lngs in proptest::collection::vec(-170.0..170.0f64, 1..20),
        ) {
            let points: Vec<Coordinates> = lats
                .iter()
                .zip(&lngs)
                .map(|(&lat, &lng)| Coordinates::new(lat, lng))
                .collect();
            let (width, height, padding) = (800.0, 600.0, 40.0);
            let projector = SphereProjector::new(&points, width, height, padding);

            for &point in &points {
                let projected = projector.project(point);
                prop_assert!(projected.x >= padding - 1e-6);
                prop_assert!(projected.x <= width - padding + 1e-6);
                prop_assert!(projected.y >= padding - 1e-6);
                prop_assert!(projected.y <= height - padding + 1e-6);
            }
        }
    }
}
