//! Column ordering and sticky pin offsets.

use serde::Serialize;

use crate::state::{ColumnPinning, PinSide};

/// z-index of pinned header cells.
pub const PINNED_HEADER_Z: u8 = 3;
/// z-index of pinned body cells.
pub const PINNED_CELL_Z: u8 = 2;

/// Sticky positioning for one pinned column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PinStyle {
    pub side: PinSide,
    /// Distance from the pinned edge in pixels.
    pub offset: u32,
    pub header_z: u8,
    pub cell_z: u8,
    /// Box shadow cast toward the scrolling area.
    pub shadow: &'static str,
}

const LEFT_SHADOW: &str = "2px 0 4px -2px rgba(0, 0, 0, 0.15)";
const RIGHT_SHADOW: &str = "-2px 0 4px -2px rgba(0, 0, 0, 0.15)";

/// One visible column after ordering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placed {
    /// Index into the column definitions.
    pub index: usize,
    pub width: u32,
    pub pin: Option<PinStyle>,
}

/// Orders column indices left-pinned first (pin order), then unpinned
/// (definition order), then right-pinned (pin order).
pub fn display_order(ids: &[&str], pinning: &ColumnPinning) -> Vec<usize> {
    let position = |id: &String| ids.iter().position(|c| *c == id.as_str());
    let mut order: Vec<usize> = pinning.left.iter().filter_map(position).collect();
    order.extend(
        ids.iter()
            .enumerate()
            .filter(|(_, id)| pinning.side_of(id) == PinSide::None)
            .map(|(i, _)| i),
    );
    order.extend(pinning.right.iter().filter_map(position));
    order
}

/// Lays out the visible columns with widths and pin offsets.
///
/// `columns` are `(id, width, visible)` triples in definition order.
pub fn place(columns: &[(&str, u32, bool)], pinning: &ColumnPinning) -> Vec<Placed> {
    let ids: Vec<&str> = columns.iter().map(|c| c.0).collect();
    let visible: Vec<usize> = display_order(&ids, pinning)
        .into_iter()
        .filter(|&i| columns[i].2)
        .collect();

    let mut placed: Vec<Placed> = visible
        .iter()
        .map(|&index| Placed {
            index,
            width: columns[index].1,
            pin: None,
        })
        .collect();

    let mut left = 0u32;
    for p in placed.iter_mut() {
        if pinning.side_of(columns[p.index].0) == PinSide::Left {
            p.pin = Some(pin_style(PinSide::Left, left));
            left = left.saturating_add(p.width);
        }
    }
    let mut right = 0u32;
    for p in placed.iter_mut().rev() {
        if pinning.side_of(columns[p.index].0) == PinSide::Right {
            p.pin = Some(pin_style(PinSide::Right, right));
            right = right.saturating_add(p.width);
        }
    }
    placed
}

fn pin_style(side: PinSide, offset: u32) -> PinStyle {
    PinStyle {
        side,
        offset,
        header_z: PINNED_HEADER_Z,
        cell_z: PINNED_CELL_Z,
        shadow: match side {
            PinSide::Right => RIGHT_SHADOW,
            _ => LEFT_SHADOW,
        },
    }
}
