//! Pose text handling and planar bounds of entities

use super::element::Element;

/// Entity tags that carry a placement in the world
pub const POSED_TAGS: &[&str] = &["model", "actor"];

/// Parse whitespace separated numbers, stopping at the first non-number
pub fn parse_values(text: &str) -> Vec<f64> {
    text.split_whitespace()
        .map_while(|s| s.parse::<f64>().ok())
        .collect()
}

/// Planar (x, y) position from an element's direct `<pose>` child
///
/// Requires at least two leading numeric values.
pub fn planar_position(elem: &Element) -> Option<(f64, f64)> {
    let values = parse_values(elem.child_text("pose")?);
    match values.as_slice() {
        [x, y, ..] => Some((*x, *y)),
        _ => None,
    }
}

/// Full 6-DOF pose: x y z roll pitch yaw
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose6 {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
}

impl Pose6 {
    /// Parse the first six values; `None` if fewer than six are numeric
    pub fn parse(text: &str) -> Option<Self> {
        let values = parse_values(text);
        match values.as_slice() {
            [x, y, z, roll, pitch, yaw, ..] => Some(Self {
                position: [*x, *y, *z],
                rotation: [*roll, *pitch, *yaw],
            }),
            _ => None,
        }
    }

    pub fn translated(mut self, offset: [f64; 3]) -> Self {
        for (p, d) in self.position.iter_mut().zip(offset) {
            *p += d;
        }
        self
    }

    pub fn to_text(&self) -> String {
        let [x, y, z] = self.position;
        let [roll, pitch, yaw] = self.rotation;
        format!("{} {} {} {} {} {}", x, y, z, roll, pitch, yaw)
    }
}

/// Axis-aligned planar bounds over entity positions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    fn from_point(x: f64, y: f64) -> Self {
        Self {
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        }
    }

    fn include(mut self, x: f64, y: f64) -> Self {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
        self
    }

    /// Bounds over all `model`/`actor` elements with a usable pose
    ///
    /// Other tags and entities without a parseable pose are skipped. Returns
    /// `None` when nothing contributed.
    pub fn of_elements<'a, I>(elements: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Element>,
    {
        elements
            .into_iter()
            .filter(|e| POSED_TAGS.contains(&e.tag.as_str()))
            .filter_map(planar_position)
            .fold(None, |acc: Option<Bounds>, (x, y)| match acc {
                Some(b) => Some(b.include(x, y)),
                None => Some(Bounds::from_point(x, y)),
            })
    }

    pub fn center_y(&self) -> f64 {
        0.5 * (self.min_y + self.max_y)
    }

    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.min_x, self.max_x, self.min_y, self.max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posed(tag: &str, pose: &str) -> Element {
        Element::new(tag).with_child(Element::new("pose").with_text(pose))
    }

    #[test]
    fn test_bounds_of_two_models() {
        let elems = vec![posed("model", "1 2 0 0 0 0"), posed("model", "3 -1 0 0 0 0")];
        let bounds = Bounds::of_elements(&elems).unwrap();
        assert_eq!(bounds.as_tuple(), (1.0, 3.0, -1.0, 2.0));
    }

    #[test]
    fn test_bounds_none_without_qualifying_elements() {
        let elems = vec![
            posed("light", "5 5 10 0 0 0"),
            Element::new("model"),
            posed("actor", "7"),
            posed("model", "   "),
        ];
        assert_eq!(Bounds::of_elements(&elems), None);
        assert_eq!(Bounds::of_elements(std::iter::empty()), None);
    }

    #[test]
    fn test_bounds_accept_position_only_pose() {
        let elems = vec![posed("actor", "-2 4"), posed("model", "oops 1 0 0 0 0")];
        let bounds = Bounds::of_elements(&elems).unwrap();
        assert_eq!(bounds.as_tuple(), (-2.0, -2.0, 4.0, 4.0));
    }

    #[test]
    fn test_bounds_order_independent() {
        let mut elems = vec![
            posed("model", "0 0 0 0 0 0"),
            posed("actor", "4 -3 0 0 0 0"),
            posed("model", "-1 8 0 0 0 0"),
        ];
        let forward = Bounds::of_elements(&elems);
        elems.reverse();
        assert_eq!(Bounds::of_elements(&elems), forward);
    }

    #[test]
    fn test_pose6_parse_and_translate() {
        let pose = Pose6::parse(" 1 2 3 0.1 0.2 1.57 ").unwrap();
        let moved = pose.translated([1.5, -2.0, 0.0]);
        assert_eq!(moved.to_text(), "2.5 0 3 0.1 0.2 1.57");
        assert!(Pose6::parse("1 2").is_none());
        assert!(Pose6::parse("1 2 3 0 0 x").is_none());
    }
}
