use glam::{IVec3, Vec3};

/// The kinds of block the player can place.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Grass = 0,
    Dirt = 1,
    Stone = 2,
    Log = 3,
    Leaf = 4,
}

impl BlockKind {
    pub const ALL: [BlockKind; 5] = [
        BlockKind::Grass,
        BlockKind::Dirt,
        BlockKind::Stone,
        BlockKind::Log,
        BlockKind::Leaf,
    ];

    pub fn color(self) -> [f32; 4] {
        match self {
            BlockKind::Grass => [0.298, 0.686, 0.314, 1.0],
            BlockKind::Dirt => [0.545, 0.369, 0.235, 1.0],
            BlockKind::Stone => [0.620, 0.620, 0.620, 1.0],
            BlockKind::Log => [0.361, 0.227, 0.118, 1.0],
            BlockKind::Leaf => [0.400, 0.733, 0.416, 1.0],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BlockKind::Grass => "Grass",
            BlockKind::Dirt => "Dirt",
            BlockKind::Stone => "Stone",
            BlockKind::Log => "Log",
            BlockKind::Leaf => "Leaf",
        }
    }

    /// Next/previous kind for mouse-wheel cycling.
    pub fn cycled(self, forward: bool) -> BlockKind {
        let idx = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        let len = Self::ALL.len();
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        Self::ALL[next]
    }
}

/// A block the player has placed, pinned to the integer lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacedBlock {
    pub id: u64,
    pub cell: IVec3,
    pub kind: BlockKind,
}

/// All player-placed blocks of the session, in placement order.
///
/// Ids are unique for the process lifetime; nothing here is persisted.
pub struct BlockSet {
    blocks: Vec<PlacedBlock>,
    next_id: u64,
}

/// Half extent of the buildable square region.
pub const BUILD_HALF: i32 = 14;
/// Blocks can never sink below the ground surface.
pub const BUILD_MIN_Y: i32 = 1;

/// Round a world-space point to its nearest lattice cell.
pub fn snap_to_lattice(p: Vec3) -> IVec3 {
    IVec3::new(
        p.x.round() as i32,
        p.y.round() as i32,
        p.z.round() as i32,
    )
}

/// Clamp a lattice cell into the buildable region.
pub fn clamp_to_bounds(cell: IVec3) -> IVec3 {
    IVec3::new(
        cell.x.clamp(-BUILD_HALF, BUILD_HALF),
        cell.y.max(BUILD_MIN_Y),
        cell.z.clamp(-BUILD_HALF, BUILD_HALF),
    )
}

impl BlockSet {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            next_id: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedBlock> {
        self.blocks.iter()
    }

    pub fn contains(&self, cell: IVec3) -> bool {
        self.blocks.iter().any(|b| b.cell == cell)
    }

    pub fn get_at(&self, cell: IVec3) -> Option<&PlacedBlock> {
        self.blocks.iter().find(|b| b.cell == cell)
    }

    /// Place a block near `point`, snapped and clamped into the build
    /// region. Returns the assigned id, or None if the target cell is
    /// already occupied.
    pub fn place(&mut self, point: Vec3, kind: BlockKind) -> Option<u64> {
        let cell = clamp_to_bounds(snap_to_lattice(point));
        if self.contains(cell) {
            return None;
        }
        self.next_id += 1;
        let id = self.next_id;
        self.blocks.push(PlacedBlock { id, cell, kind });
        Some(id)
    }

    /// Remove the block with the given id. Returns the removed block.
    pub fn remove(&mut self, id: u64) -> Option<PlacedBlock> {
        let idx = self.blocks.iter().position(|b| b.id == id)?;
        Some(self.blocks.remove(idx))
    }

    /// Remove whatever block occupies `cell`, if any.
    pub fn break_at(&mut self, cell: IVec3) -> Option<PlacedBlock> {
        let id = self.get_at(cell)?.id;
        self.remove(id)
    }
}

impl Default for BlockSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapping_rounds_to_nearest_lattice_point() {
        assert_eq!(snap_to_lattice(Vec3::new(0.4, 1.6, -0.5)), IVec3::new(0, 2, -1));
        assert_eq!(snap_to_lattice(Vec3::new(-2.49, 3.0, 7.51)), IVec3::new(-2, 3, 8));
        assert_eq!(snap_to_lattice(Vec3::new(13.999, 1.001, -14.0)), IVec3::new(14, 1, -14));
    }

    #[test]
    fn placement_never_sinks_below_ground() {
        let mut set = BlockSet::new();
        set.place(Vec3::new(0.0, -3.2, 0.0), BlockKind::Stone).unwrap();
        assert_eq!(set.iter().next().unwrap().cell.y, BUILD_MIN_Y);
    }

    #[test]
    fn placement_clamps_to_build_region() {
        let mut set = BlockSet::new();
        set.place(Vec3::new(99.0, 2.0, -99.0), BlockKind::Dirt).unwrap();
        let cell = set.iter().next().unwrap().cell;
        assert_eq!(cell.x, BUILD_HALF);
        assert_eq!(cell.z, -BUILD_HALF);
    }

    #[test]
    fn ids_are_unique_and_monotonic() {
        let mut set = BlockSet::new();
        let a = set.place(Vec3::new(0.0, 1.0, 0.0), BlockKind::Grass).unwrap();
        let b = set.place(Vec3::new(1.0, 1.0, 0.0), BlockKind::Grass).unwrap();
        set.remove(a);
        let c = set.place(Vec3::new(2.0, 1.0, 0.0), BlockKind::Grass).unwrap();
        assert!(b > a);
        assert!(c > b);
    }

    #[test]
    fn removal_by_id_takes_exactly_that_block() {
        let mut set = BlockSet::new();
        let a = set.place(Vec3::new(0.0, 1.0, 0.0), BlockKind::Grass).unwrap();
        let b = set.place(Vec3::new(1.0, 1.0, 0.0), BlockKind::Log).unwrap();
        let removed = set.remove(a).unwrap();
        assert_eq!(removed.id, a);
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().unwrap().id, b);
        assert!(set.remove(a).is_none());
    }

    #[test]
    fn break_at_hits_the_occupying_block() {
        let mut set = BlockSet::new();
        set.place(Vec3::new(3.0, 2.0, -4.0), BlockKind::Leaf).unwrap();
        assert!(set.break_at(IVec3::new(3, 2, -4)).is_some());
        assert!(set.break_at(IVec3::new(3, 2, -4)).is_none());
        assert!(set.is_empty());
    }

    #[test]
    fn occupied_cell_rejects_a_second_block() {
        let mut set = BlockSet::new();
        assert!(set.place(Vec3::new(0.0, 1.0, 0.0), BlockKind::Grass).is_some());
        assert!(set.place(Vec3::new(0.2, 1.1, -0.3), BlockKind::Stone).is_none());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn wheel_cycling_wraps_both_ways() {
        assert_eq!(BlockKind::Leaf.cycled(true), BlockKind::Grass);
        assert_eq!(BlockKind::Grass.cycled(false), BlockKind::Leaf);
        assert_eq!(BlockKind::Grass.cycled(true), BlockKind::Dirt);
    }
}
