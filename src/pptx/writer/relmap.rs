/// Relationship ID mapper for tracking relationships during presentation generation.
///
/// Media and chart parts are related to their slide before the slide
/// XML is generated; the mapper carries the resulting ids into XML generation.
use std::collections::HashMap;

/// Maps slide shapes to their relationship IDs, per slide.
#[derive(Debug, Default)]
pub struct RelationshipMapper {
    /// (slide_index, shape_index) -> image relationship id
    image_ids: HashMap<(usize, usize), String>,
    /// (slide_index, shape_index) -> chart relationship id
    chart_ids: HashMap<(usize, usize), String>,
}

impl RelationshipMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image relationship mapping for the picture at `shape_index`.
    pub fn add_image(&mut self, slide_index: usize, shape_index: usize, rel_id: String) {
        self.image_ids.insert((slide_index, shape_index), rel_id);
    }

    pub fn get_image_id(&self, slide_index: usize, shape_index: usize) -> Option<&str> {
        self.image_ids
            .get(&(slide_index, shape_index))
            .map(|s| s.as_str())
    }

    /// Add a chart relationship mapping for the graphic frame at `shape_index`.
    pub fn add_chart(&mut self, slide_index: usize, shape_index: usize, rel_id: String) {
        self.chart_ids.insert((slide_index, shape_index), rel_id);
    }

    pub fn get_chart_id(&self, slide_index: usize, shape_index: usize) -> Option<&str> {
        self.chart_ids
            .get(&(slide_index, shape_index))
            .map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_per_slide() {
        let mut mapper = RelationshipMapper::new();
        mapper.add_image(0, 2, "rId2".to_string());
        mapper.add_image(1, 2, "rId5".to_string());
        mapper.add_chart(1, 3, "rId6".to_string());

        assert_eq!(mapper.get_image_id(0, 2), Some("rId2"));
        assert_eq!(mapper.get_image_id(1, 2), Some("rId5"));
        assert_eq!(mapper.get_image_id(1, 3), None);
        assert_eq!(mapper.get_chart_id(1, 3), Some("rId6"));
    }
}
