//! Per-link, per-contaminant filters.

use std::collections::HashMap;

use afn_core::LinkId;

use crate::error::{TransportError, TransportResult};

/// A filter element on a link.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Filter {
    /// Fraction removed when fully on, in [0, 1].
    pub efficiency: f64,
    /// Schedule value scaling the efficiency, in [0, 1].
    pub control: f64,
}

impl Filter {
    pub fn new(efficiency: f64) -> TransportResult<Self> {
        Self::with_control(efficiency, 1.0)
    }

    pub fn with_control(efficiency: f64, control: f64) -> TransportResult<Self> {
        for (what, v) in [("efficiency", efficiency), ("control", control)] {
            if !(0.0..=1.0).contains(&v) {
                return Err(TransportError::InvalidArg {
                    what: format!("filter {what} must lie in [0, 1], got {v}"),
                });
            }
        }
        Ok(Self {
            efficiency,
            control,
        })
    }

    /// Effective removal fraction.
    pub fn removal(&self) -> f64 {
        self.efficiency * self.control
    }
}

/// Ordered filter lists keyed by link and contaminant.
#[derive(Clone, Debug, Default)]
pub struct LinkFilters {
    filters: HashMap<(LinkId, String), Vec<Filter>>,
}

impl LinkFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter to the link's list for `contaminant`.
    pub fn attach(&mut self, link: LinkId, contaminant: impl Into<String>, filter: Filter) {
        self.filters
            .entry((link, contaminant.into()))
            .or_default()
            .push(filter);
    }

    pub fn get(&self, link: LinkId, contaminant: &str) -> &[Filter] {
        self.filters
            .get(&(link, contaminant.to_string()))
            .map_or(&[], Vec::as_slice)
    }

    /// Fraction of `contaminant` passing through `link`.
    ///
    /// `None` when any filter removes everything.
    pub fn inefficiency(&self, link: LinkId, contaminant: &str) -> Option<f64> {
        let mut ineff = 1.0;
        for filter in self.get(link, contaminant) {
            let removal = filter.removal();
            if removal >= 1.0 {
                return None;
            }
            ineff *= 1.0 - removal;
        }
        Some(ineff)
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}
