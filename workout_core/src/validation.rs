//! Input checks for sets entered by the user.
//!
//! The session engine accepts whatever it is given; hosts run these checks
//! before recording a set.

use crate::{Error, Result};

pub const MAX_REPS_PER_SET: u32 = 999;
pub const MAX_WEIGHT: f64 = 9999.0;
pub const MAX_RIR: u8 = 10;

/// Validate the user-entered fields of a set
pub fn validate_set(reps: u32, weight: Option<f64>, rir: Option<u8>) -> Result<()> {
    if reps == 0 {
        return Err(Error::InvalidSet("reps must be positive".into()));
    }
    if reps > MAX_REPS_PER_SET {
        return Err(Error::InvalidSet(format!(
            "reps {} exceeds maximum of {}",
            reps, MAX_REPS_PER_SET
        )));
    }

    if let Some(w) = weight {
        if !w.is_finite() || w < 0.0 {
            return Err(Error::InvalidSet(format!("weight {} must be 0 or more", w)));
        }
        if w > MAX_WEIGHT {
            return Err(Error::InvalidSet(format!(
                "weight {} exceeds maximum of {}",
                w, MAX_WEIGHT
            )));
        }
    }

    if let Some(r) = rir {
        if r > MAX_RIR {
            return Err(Error::InvalidSet(format!(
                "RIR {} must be between 0 and {}",
                r, MAX_RIR
            )));
        }
    }

    Ok(())
}
