//! Position-weighted attribute redistribution
//!
//! Turns an OVR delta into per-attribute changes. The rating intensity picks
//! a step size and each position weights the attributes it actually plays
//! with; unknown positions spread the change evenly.

use crate::app::aggregation::round_half_up;
use crate::app::evaluation_config::{ATTR_MAX, ATTR_MIN, OVR_MAX, OVR_MIN};
use crate::domain::entities::{AttributeSet, Position};

/// Step size from the mean rating: strong opinions move attributes harder
pub fn intensity(mean: f64) -> i32 {
    if mean >= 9.0 {
        2
    } else if mean >= 7.0 {
        1
    } else if mean <= 3.0 {
        -2
    } else if mean <= 5.0 {
        -1
    } else {
        0
    }
}

/// Per-attribute deltas for a position at a given intensity. The primary
/// attribute moves at double weight, the two secondaries at single weight.
pub fn attribute_deltas(position: Position, intensity: i32) -> AttributeSet {
    let mut deltas = AttributeSet::flat(0);
    match position {
        Position::Goalkeeper | Position::Defender => {
            deltas.def = intensity * 2;
            deltas.phy = intensity;
            deltas.pas = intensity;
        }
        Position::Forward => {
            deltas.sho = intensity * 2;
            deltas.pac = intensity;
            deltas.dri = intensity;
        }
        Position::Midfielder => {
            deltas.pas = intensity * 2;
            deltas.dri = intensity;
            deltas.pac = intensity;
        }
        Position::Wing => {
            deltas.pac = intensity * 2;
            deltas.pas = intensity;
            deltas.def = intensity;
        }
        Position::Other => {
            let flat = round_half_up(intensity as f64 / 2.0);
            deltas = AttributeSet::flat(flat);
        }
    }
    deltas
}

/// Clamp an overall rating into its allowed band
pub fn clamp_ovr(ovr: i32) -> i32 {
    ovr.clamp(OVR_MIN, OVR_MAX)
}

fn clamp_attr(value: i32) -> i32 {
    value.clamp(ATTR_MIN, ATTR_MAX)
}

/// Apply deltas to an attribute sheet, clamping every attribute
pub fn apply_attribute_deltas(attrs: &AttributeSet, deltas: &AttributeSet) -> AttributeSet {
    AttributeSet {
        pac: clamp_attr(attrs.pac + deltas.pac),
        sho: clamp_attr(attrs.sho + deltas.sho),
        pas: clamp_attr(attrs.pas + deltas.pas),
        dri: clamp_attr(attrs.dri + deltas.dri),
        def: clamp_attr(attrs.def + deltas.def),
        phy: clamp_attr(attrs.phy + deltas.phy),
    }
}
