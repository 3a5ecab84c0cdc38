//! intake-instruments
//!
//! Built-in clinical screening instruments expressed as ready-to-run form
//! schemas. Pure data: each schema carries its own scoring and alert
//! completion actions.

pub mod error;
pub mod instruments;
pub mod scoring;

use intake_core::models::Schema;

use error::InstrumentError;
use scoring::SeverityBand;

/// Trait implemented by each built-in screening instrument.
pub trait Instrument: Send + Sync {
    /// Unique identifier, also used as the schema id (e.g., "phq9").
    fn id(&self) -> &str;

    /// Human-readable name (e.g., "PHQ-9").
    fn name(&self) -> &str;

    /// The executable form definition.
    fn schema(&self) -> &Schema;

    /// Result field written by the instrument's total-score action.
    fn score_field(&self) -> &str;

    /// Interpretation bands for the total score, lowest first.
    fn severity_bands(&self) -> &[SeverityBand];

    /// The band a total score falls in, if any.
    fn severity(&self, score: f64) -> Option<&SeverityBand> {
        self.severity_bands()
            .iter()
            .find(|band| band.range.contains(score))
    }
}

/// Return all registered instruments.
pub fn all_instruments() -> Vec<Box<dyn Instrument>> {
    vec![
        Box::new(instruments::phq9::Phq9),
        Box::new(instruments::gad7::Gad7),
    ]
}

/// Look up an instrument by ID.
pub fn get_instrument(id: &str) -> Option<Box<dyn Instrument>> {
    all_instruments().into_iter().find(|i| i.id() == id)
}

/// Like [`get_instrument`], for callers that treat a miss as an error.
pub fn require_instrument(id: &str) -> Result<Box<dyn Instrument>, InstrumentError> {
    get_instrument(id).ok_or_else(|| InstrumentError::UnknownInstrument(id.to_string()))
}
