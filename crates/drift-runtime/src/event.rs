//! Host events delivered to particle fields

use drift_core::FieldId;

/// Lifecycle and pointer events a host pushes for its fields.
///
/// Pointer moves are in host coordinates; impulse coordinates are relative to
/// the addressed field's container.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Pointer moved to a host-space position
    PointerMoved { x: f32, y: f32 },
    /// Pointer left the host window entirely
    PointerLost,
    /// Pointer entered a field's container
    PointerEntered { field: FieldId },
    /// Pointer left a field's container
    PointerLeft { field: FieldId },
    /// Spawn an impulse batch at a field-relative point
    Impulse { field: FieldId, x: f32, y: f32 },
    /// Container was resized
    Resized { field: FieldId, width: f32, height: f32 },
    Start(FieldId),
    Stop(FieldId),
    Clear(FieldId),
}

impl HostEvent {
    /// The field this event is addressed to, if any
    pub fn field(&self) -> Option<FieldId> {
        match self {
            HostEvent::PointerMoved { .. } | HostEvent::PointerLost => None,
            HostEvent::PointerEntered { field }
            | HostEvent::PointerLeft { field }
            | HostEvent::Impulse { field, .. }
            | HostEvent::Resized { field, .. } => Some(*field),
            HostEvent::Start(field) | HostEvent::Stop(field) | HostEvent::Clear(field) => {
                Some(*field)
            }
        }
    }
}
