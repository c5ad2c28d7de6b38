//! Lookups over parsed metric families
//!
//! `find_value` locates one instance by its exact label set and extracts its
//! value. `collect_labels` returns the label maps of every instance of a
//! family. The two deliberately differ on absence: the first reports
//! `ProbeError::NotFound`, the second returns an empty vector.

use std::collections::HashMap;

use crate::error::{ProbeError, ProbeResult};
use crate::family::{MetricFamily, MetricInstance, MetricKind, MetricValue};

/// Exact label set an instance must carry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelConstraints {
    pairs: Vec<(String, String)>,
}

impl LabelConstraints {
    /// Build constraints from alternating name/value strings
    ///
    /// # Errors
    /// Returns `ProbeError::OddLabelArguments` if `flat` has an odd length.
    pub fn from_flat<S: AsRef<str>>(flat: &[S]) -> ProbeResult<Self> {
        if flat.len() % 2 != 0 {
            return Err(ProbeError::OddLabelArguments(flat.len()));
        }

        let pairs = flat
            .chunks_exact(2)
            .map(|pair| (pair[0].as_ref().to_string(), pair[1].as_ref().to_string()))
            .collect();

        Ok(Self { pairs })
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// True when every pair is carried by the instance and the instance has
    /// no other labels. Label order does not matter.
    pub fn matches(&self, instance: &MetricInstance) -> bool {
        if instance.labels.len() != self.pairs.len() {
            return false;
        }

        self.pairs.iter().all(|(name, value)| {
            instance
                .labels
                .iter()
                .any(|l| &l.name == name && &l.value == value)
        })
    }

    /// Render as `name="value",...` for error messages
    pub fn describe(&self) -> String {
        self.pairs
            .iter()
            .map(|(name, value)| format!("{}=\"{}\"", name, value))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Find the value of the instance of `family_name` carrying exactly `constraints`
///
/// A family with a single instance answers an empty constraint set directly.
/// Otherwise the first instance, in parse order, whose labels equal the
/// constraint set wins.
pub fn find_value(
    families: &[MetricFamily],
    family_name: &str,
    constraints: &LabelConstraints,
) -> ProbeResult<f64> {
    for family in families.iter().filter(|f| f.name == family_name) {
        // metric without labels
        if family.metrics.len() == 1 && constraints.is_empty() {
            return extract_value(family.kind, &family.metrics[0]);
        }

        if let Some(instance) = family.metrics.iter().find(|m| constraints.matches(m)) {
            return extract_value(family.kind, instance);
        }
    }

    Err(ProbeError::NotFound {
        family: family_name.to_string(),
        labels: constraints.describe(),
    })
}

/// Extract the scalar value of an instance according to its family's type
pub fn extract_value(kind: MetricKind, instance: &MetricInstance) -> ProbeResult<f64> {
    match (kind, &instance.value) {
        (MetricKind::Counter, MetricValue::Counter(v)) => Ok(*v),
        (MetricKind::Gauge, MetricValue::Gauge(v)) => Ok(*v),
        (MetricKind::Untyped, MetricValue::Untyped(v)) => Ok(*v),
        (MetricKind::Counter | MetricKind::Gauge | MetricKind::Untyped, value) => {
            Err(ProbeError::UnsupportedType(value.kind()))
        }
        (kind, _) => Err(ProbeError::UnsupportedType(kind)),
    }
}

/// Collect the labels of every instance of `family_name`, one map per instance
pub fn collect_labels(families: &[MetricFamily], family_name: &str) -> Vec<HashMap<String, String>> {
    let mut labels = Vec::new();

    for family in families.iter().filter(|f| f.name == family_name) {
        for instance in &family.metrics {
            let mut lbls = HashMap::new();
            for label in &instance.labels {
                if !label.name.is_empty() {
                    lbls.insert(label.name.clone(), label.value.clone());
                }
            }
            labels.push(lbls);
        }
    }

    labels
}
