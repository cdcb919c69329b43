use crate::collision::Contact;
use crate::objects::Body;

/// Single-contact impulse resolution with positional correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactSolver {
    /// Penetration percentage to correct per contact
    pub correction_percent: f32,
    /// Penetration allowed to remain
    pub correction_slop: f32,
}

impl Default for ContactSolver {
    fn default() -> Self {
        Self {
            correction_percent: 1.0,
            correction_slop: 0.0,
        }
    }
}

/// Restitution of a contact: each side's coefficient weighted by its body's mass.
pub fn combined_restitution(mass_a: f32, restitution_a: f32, mass_b: f32, restitution_b: f32) -> f32 {
    let total = mass_a + mass_b;
    if total <= 0.0 {
        return restitution_a.min(restitution_b);
    }
    (restitution_a * mass_a + restitution_b * mass_b) / total
}

impl ContactSolver {
    pub fn new(correction_percent: f32, correction_slop: f32) -> Self {
        Self {
            correction_percent,
            correction_slop,
        }
    }

    /// Resolves `contact` between `a` and `b`, its normal pointing from B to A.
    /// Returns the normal impulse applied (0 when the bodies already separate).
    pub fn resolve(
        &self,
        a: &mut Body,
        b: &mut Body,
        restitution_a: f32,
        restitution_b: f32,
        contact: &Contact,
    ) -> f32 {
        // Keep the dynamic body in the A role
        if a.is_static() && b.is_dynamic() {
            let flipped = contact.flipped();
            return self.resolve(b, a, restitution_b, restitution_a, &flipped);
        }

        let total_inv_mass = a.inverse_mass() + b.inverse_mass();
        if total_inv_mass <= 0.0 {
            return 0.0;
        }

        let impulse = self.apply_impulse(a, b, restitution_a, restitution_b, contact, total_inv_mass);
        self.apply_positional_correction(a, b, contact, total_inv_mass);

        log::trace!(
            "contact n={:?} depth={:.4} impulse={:.4}",
            contact.normal,
            contact.penetration,
            impulse
        );
        impulse
    }

    fn apply_impulse(
        &self,
        a: &mut Body,
        b: &mut Body,
        restitution_a: f32,
        restitution_b: f32,
        contact: &Contact,
        total_inv_mass: f32,
    ) -> f32 {
        let normal = contact.normal;
        let separating_velocity = (a.velocity - b.velocity).dot(normal);

        // If objects are already moving apart, no impulse needed
        if separating_velocity > 0.0 {
            return 0.0;
        }

        let e = combined_restitution(a.mass, restitution_a, b.mass, restitution_b);
        let j = -(1.0 + e) * separating_velocity / total_inv_mass;

        if a.is_dynamic() {
            a.velocity += normal * (j * a.inverse_mass());
        }
        if b.is_dynamic() {
            b.velocity -= normal * (j * b.inverse_mass());
        }
        j
    }

    /// Pushes the bodies apart along the normal, each by its inverse-mass share.
    fn apply_positional_correction(&self, a: &mut Body, b: &mut Body, contact: &Contact, total_inv_mass: f32) {
        let correction_magnitude = (contact.penetration - self.correction_slop).max(0.0);
        if correction_magnitude <= 0.0 {
            return;
        }

        let correction = contact.normal * (correction_magnitude / total_inv_mass * self.correction_percent);

        if a.is_dynamic() {
            a.position += correction * a.inverse_mass();
        }
        if b.is_dynamic() {
            b.position -= correction * b.inverse_mass();
        }
    }
}
