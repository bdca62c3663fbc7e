//! Element handles
//!
//! Hosts own their elements. The animation layer only ever sees an
//! `ElementId`, so a handle can outlive the element it names without
//! keeping anything alive; controllers treat unknown handles as no-ops.

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a renderable region owned by the host
    pub struct ElementId;
}
