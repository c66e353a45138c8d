use crate::ship::Broadside;
use nalgebra::Vector2;

/// What an attacking ship should do on this refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Engagement {
    Fire(Broadside),
    /// In range and loaded, but the target is not abeam yet.
    Align,
    /// Reloading or out of range: close the distance.
    Pursue,
}

/// Decides between firing, turning broadside and pursuing.
///
/// `heading` is the unit direction of travel and `to_target` the unit
/// direction toward the target. A broadside bears when the two are within
/// `precision` of perpendicular; the cross product picks the side.
pub fn engage(
    heading: Vector2<f64>,
    to_target: Vector2<f64>,
    distance: f64,
    can_fire: bool,
    range: f64,
    precision: f64,
) -> Engagement {
    if !can_fire || distance > range {
        return Engagement::Pursue;
    }
    if heading.dot(&to_target).abs() >= precision {
        return Engagement::Align;
    }
    if heading.perp(&to_target) > 0.0 {
        Engagement::Fire(Broadside::Left)
    } else {
        Engagement::Fire(Broadside::Right)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::vector;

    const NORTH: Vector2<f64> = vector![0.0, 1.0];

    #[test]
    fn test_fires_at_target_abeam() {
        assert_eq!(
            engage(NORTH, vector![-1.0, 0.0], 8.0, true, 10.0, 0.1),
            Engagement::Fire(Broadside::Left)
        );
        assert_eq!(
            engage(NORTH, vector![1.0, 0.0], 10.0, true, 10.0, 0.1),
            Engagement::Fire(Broadside::Right)
        );
    }

    #[test]
    fn test_aligns_before_firing() {
        let ahead = vector![0.6, 0.8];
        assert_eq!(engage(NORTH, ahead, 5.0, true, 10.0, 0.1), Engagement::Align);
    }

    #[test]
    fn test_pursues_when_unable_to_fire() {
        let abeam = vector![1.0, 0.0];
        assert_eq!(engage(NORTH, abeam, 5.0, false, 10.0, 0.1), Engagement::Pursue);
        assert_eq!(engage(NORTH, abeam, 10.5, true, 10.0, 0.1), Engagement::Pursue);
    }
}
