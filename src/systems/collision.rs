//! Contact detection between moving objects and solid geometry.
//!
//! Every entity with a [`PreviousPosition`] is a mover. Each tick the host
//! snapshots positions before behaviors run, lets them move, then runs
//! [`collision_detector`] to report every mover/solid overlap together with
//! the side that was hit. Touching edges do not count as overlap.

use bevy_ecs::prelude::*;

use crate::behaviors::behavior::{CollisionData, CollisionOther, CollisionSide};
use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::{MapPosition, PreviousPosition};
use crate::components::objectid::ObjectId;
use crate::components::objectkind::{ObjectKind, Solid};
use crate::events::collision::ContactMessage;

/// Slack when deciding whether a mover was above or below an obstacle on
/// the previous tick.
const SIDE_EPSILON: f32 = 0.5;

/// Record where every mover starts the tick.
pub fn snapshot_previous_positions(mut query: Query<(&MapPosition, &mut PreviousPosition)>) {
    for (position, mut previous) in query.iter_mut() {
        *previous = PreviousPosition::from(*position);
    }
}

/// Work out which face of `other` a mover ran into.
///
/// A mover that was fully above the obstacle last tick and is not rising
/// landed on `Top`. One that was fully below and is rising hit `Bottom`.
/// Anything else is a side hit, decided by comparing centres.
pub fn resolve_side(
    previous: PreviousPosition,
    current: MapPosition,
    collider: &BoxCollider,
    other_pos: MapPosition,
    other: &BoxCollider,
) -> CollisionData {
    let (min_x, min_y, max_x, max_y) = collider.aabb(current.x, current.y);
    let (o_min_x, o_min_y, o_max_x, o_max_y) = other.aabb(other_pos.x, other_pos.y);
    let overlap_x = max_x.min(o_max_x) - min_x.max(o_min_x);
    let overlap_y = max_y.min(o_max_y) - min_y.max(o_min_y);

    let falling = current.y >= previous.y;
    if falling && previous.y + collider.height <= o_min_y + SIDE_EPSILON {
        return CollisionData {
            side: CollisionSide::Top,
            overlap: overlap_y,
        };
    }
    if !falling && previous.y >= o_max_y - SIDE_EPSILON {
        return CollisionData {
            side: CollisionSide::Bottom,
            overlap: overlap_y,
        };
    }
    let centre = (min_x + max_x) / 2.0;
    let other_centre = (o_min_x + o_max_x) / 2.0;
    let side = if centre < other_centre {
        CollisionSide::Left
    } else {
        CollisionSide::Right
    };
    CollisionData {
        side,
        overlap: overlap_x,
    }
}

/// Emit a [`ContactMessage`] for every mover overlapping a solid.
pub fn collision_detector(
    movers: Query<
        (Entity, &ObjectId, &MapPosition, &PreviousPosition, &BoxCollider),
        Without<Solid>,
    >,
    solids: Query<(&ObjectId, &ObjectKind, &MapPosition, &BoxCollider), With<Solid>>,
    mut writer: MessageWriter<ContactMessage>,
) {
    for (entity, object_id, position, previous, collider) in movers.iter() {
        for (other_id, kind, other_pos, other_collider) in solids.iter() {
            if !collider.overlaps(position.x, position.y, other_collider, other_pos.x, other_pos.y) {
                continue;
            }
            let data = resolve_side(*previous, *position, collider, *other_pos, other_collider);
            writer.write(ContactMessage {
                entity,
                object_id: object_id.as_str().to_string(),
                other: CollisionOther {
                    object_id: other_id.as_str().to_string(),
                    kind: *kind,
                    solid: true,
                    x: other_pos.x,
                    y: other_pos.y,
                    width: other_collider.width,
                    height: other_collider.height,
                },
                data,
            });
        }
    }
}
