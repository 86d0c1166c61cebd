//! Askama templates for the web frontend.

use askama::Template;

/// Home page: network summary, bus index and the embedded map.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub stop_count: usize,
    pub bus_count: usize,
    /// Bus names, sorted.
    pub buses: Vec<String>,
}

/// About page.
#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_renders_bus_links() {
        let page = IndexTemplate {
            stop_count: 4,
            bus_count: 2,
            buses: vec!["114".into(), "24".into()],
        };
        let html = page.render().unwrap();

        assert!(html.contains("4 stops"));
        assert!(html.contains("2 buses"));
        assert!(html.contains("/bus/114"));
        assert!(html.contains("/bus/24"));
    }

    #[test]
    fn about_renders() {
        let html = AboutTemplate.render().unwrap();
        assert!(html.contains("/route"));
    }
}
