//! Contact points and the manifold that collects them.
//!
//! The narrow phase feeds candidates through [`Manifold::accepts`],
//! duplicate removal, and [`Manifold::push`], which together implement
//! the acceptance rule: keep every candidate under the configured
//! position-error bound, plus the best candidate seen so far while the
//! search is still above it.

use glam::DVec3;
use kessler_types::constants::{BEST_ERROR_SLACK, CONTACT_DEDUP_DISTANCE};
use kessler_types::Scalar;
use serde::{Deserialize, Serialize};

/// A single detected contact between two bodies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Contact {
    /// Contact point on body A, inertial frame.
    pub point_a: DVec3,
    /// Contact point on body B, inertial frame.
    pub point_b: DVec3,
    /// Unit contact normal, inertial frame, directed from B into A.
    pub normal: DVec3,
    /// Interpenetration / closest-approach error for this candidate (m).
    pub error: Scalar,
}

/// The contact set of one body pair over one sub-step.
#[derive(Debug, Clone)]
pub struct Manifold {
    contacts: Vec<Contact>,
    /// Best (smallest) error among accepted contacts.
    pub min_error: Scalar,
    /// Worst (largest) error among accepted contacts.
    pub max_error: Scalar,
    max_error_idx: Option<usize>,
}

impl Manifold {
    /// An empty manifold.
    pub fn new() -> Self {
        Self {
            contacts: Vec::new(),
            min_error: f64::INFINITY,
            max_error: 0.0,
            max_error_idx: None,
        }
    }

    /// Accepted contacts in insertion order.
    #[inline]
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Whether a candidate with this error should enter the manifold:
    /// under the configured bound, or no worse than the best error seen
    /// so far (keeps the best candidate alive while searching).
    #[inline]
    pub fn accepts(&self, error: Scalar, max_pos_error: Scalar) -> bool {
        error <= max_pos_error || error <= self.min_error + BEST_ERROR_SLACK
    }

    /// Removes the first existing contact sharing either point with the
    /// candidate (within the dedup distance). A candidate that later
    /// fails its normal test still evicts its duplicate: the newer
    /// sighting of the same contact supersedes the older one.
    pub fn remove_duplicates(&mut self, point_a: DVec3, point_b: DVec3) {
        let hit = self.contacts.iter().position(|c| {
            (c.point_a - point_a).length() < CONTACT_DEDUP_DISTANCE
                || (c.point_b - point_b).length() < CONTACT_DEDUP_DISTANCE
        });
        if let Some(idx) = hit {
            self.contacts.remove(idx);
            match self.max_error_idx {
                Some(m) if m == idx => {
                    // The tracked worst contact left; rescan the
                    // survivors so the over-penetration gate still sees
                    // the true maximum.
                    self.max_error = 0.0;
                    self.max_error_idx = None;
                    for (i, c) in self.contacts.iter().enumerate() {
                        if c.error > self.max_error {
                            self.max_error = c.error;
                            self.max_error_idx = Some(i);
                        }
                    }
                }
                Some(m) if m > idx => self.max_error_idx = Some(m - 1),
                _ => {}
            }
        }
    }

    /// Appends an accepted contact and updates the error bookkeeping.
    pub fn push(&mut self, contact: Contact) {
        let error = contact.error;
        self.contacts.push(contact);
        if error > self.max_error {
            self.max_error = error;
            self.max_error_idx = Some(self.contacts.len() - 1);
        }
        self.min_error = self.min_error.min(error);
    }
}

impl Default for Manifold {
    fn default() -> Self {
        Self::new()
    }
}
