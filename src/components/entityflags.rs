use bevy_ecs::prelude::Component;

/// Visual flags that behaviors publish for the renderer.
///
/// Nothing enforces which behavior owns which flag. By convention each flag
/// has a single writer: movement behaviors write `facing_right`, the
/// draggable behavior writes `dragging`, the health behavior writes
/// `flashing` and `flash_visible`.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct EntityFlags {
    pub facing_right: bool,
    pub dragging: bool,
    pub flashing: bool,
    pub flash_visible: bool,
}

impl Default for EntityFlags {
    fn default() -> Self {
        Self {
            facing_right: true,
            dragging: false,
            flashing: false,
            flash_visible: true,
        }
    }
}
