//! The ring of tiles the auction is played on.

/// Number of tiles on the ring.
pub const BOARD_LENGTH: usize = 40;
/// Funds every seat starts with.
pub const STARTING_FUNDS: i64 = 1500;
/// Paid to a seat each time it completes a lap.
pub const LAP_BONUS: i64 = 200;
/// Turns after which an undecided episode is a draw.
pub const STALEMATE_TURN: usize = 300;
/// Seats per table.
pub const SEATS: usize = 4;

/// Purchase price of each tile. Zero for tiles that
/// cannot be owned; tax tiles list the tax due.
pub const COSTS: [u32; BOARD_LENGTH] = [
    0, 60, 0, 60, 200, 200, 100, 0, 100, 120, 0, 140, 150, 140, 160, 200, 180, 0, 180, 200, 0, 220,
    0, 220, 240, 200, 260, 260, 150, 280, 0, 300, 300, 0, 320, 200, 0, 250, 100, 400,
];

const STATIONS: [usize; 4] = [5, 15, 25, 35];
const STATION_RENTS: [u32; 4] = [25, 50, 100, 200];
const UTILITIES: [usize; 2] = [12, 28];
const UTILITY_MULTIPLIERS: [u32; 2] = [4, 10];
const TAXES: [usize; 2] = [4, 38];

/// Rent group of each street, `None` elsewhere.
const STREET_GROUPS: [Option<usize>; BOARD_LENGTH] = {
    let groups = [
        -1, 0, -1, 1, -1, -1, 2, -1, 2, 3, -1, 4, -1, 4, 5, -1, 6, -1, 6, 7, -1, 8, -1, 8, 9, -1,
        10, 10, -1, 11, -1, 12, 12, -1, 13, -1, -1, 14, -1, 15,
    ];
    let mut streets = [None; BOARD_LENGTH];
    let mut i = 0;
    while i < BOARD_LENGTH {
        if groups[i] >= 0 {
            streets[i] = Some(groups[i] as usize);
        }
        i += 1;
    }
    streets
};
const STREET_RENTS: [u32; 16] = [2, 4, 6, 8, 10, 12, 14, 16, 18, 20, 22, 22, 26, 28, 35, 50];

/// What landing on a tile does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    /// Nothing happens.
    Empty,
    /// A lot that can be bought, then charges rent.
    Lot(LotKind),
    /// A fixed tax is due.
    Tax(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LotKind {
    /// Fixed rent by group.
    Street(usize),
    /// Rent grows with the number of stations the owner holds.
    Station,
    /// Rent is the dice roll times a multiplier that grows
    /// with the number of utilities the owner holds.
    Utility,
}

/// Returns the kind of tile at `index`.
///
/// # Panics
/// Panics if `index` is off the board.
pub fn tile(index: usize) -> Tile {
    if let Some(group) = STREET_GROUPS[index] {
        Tile::Lot(LotKind::Street(group))
    } else if STATIONS.contains(&index) {
        Tile::Lot(LotKind::Station)
    } else if UTILITIES.contains(&index) {
        Tile::Lot(LotKind::Utility)
    } else if TAXES.contains(&index) {
        Tile::Tax(COSTS[index])
    } else {
        Tile::Empty
    }
}

/// Returns whether the tile at `index` can be owned.
pub fn is_lot(index: usize) -> bool {
    matches!(tile(index), Tile::Lot(_))
}

/// Rent due on `lot` when its owner holds `holdings`,
/// after a roll of `roll`.
pub fn rent(lot: usize, holdings: &[usize], roll: u32) -> u32 {
    let count_of = |kind: &[usize]| holdings.iter().filter(|h| kind.contains(h)).count();
    match tile(lot) {
        Tile::Lot(LotKind::Street(group)) => STREET_RENTS[group],
        Tile::Lot(LotKind::Station) => match count_of(&STATIONS) {
            0 => 0,
            n => STATION_RENTS[n.min(STATION_RENTS.len()) - 1],
        },
        Tile::Lot(LotKind::Utility) => match count_of(&UTILITIES) {
            0 => 0,
            n => UTILITY_MULTIPLIERS[n.min(UTILITY_MULTIPLIERS.len()) - 1] * roll,
        },
        Tile::Tax(_) | Tile::Empty => 0,
    }
}
