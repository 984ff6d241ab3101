//! Seats make the decisions of one player at the table.
use crate::board::{BOARD_LENGTH, COSTS, SEATS};

use neatarena_nn::{genomics::NNGenome, networks::Network};

/// Highest bid a network can place.
pub const MAX_BID: f32 = 4000.0;

/// A player at an auction table, with one method
/// per decision it is asked to make.
pub trait Seat {
    /// Whether to buy `lot` at its listed price.
    /// Declining puts the lot up for auction.
    fn decide_buy(&self, table: &TableView<'_>, lot: usize) -> bool;

    /// Sealed bid for `lot`. Bids above the seat's
    /// funds are discarded.
    fn decide_bid(&self, table: &TableView<'_>, lot: usize) -> u32;
}

/// What a seat can see of the table when deciding.
#[derive(Clone, Copy, Debug)]
pub struct TableView<'a> {
    /// The deciding seat.
    pub seat: usize,
    pub funds: &'a [i64],
    pub positions: &'a [usize],
    pub retired: &'a [bool],
    pub owners: &'a [Option<usize>; BOARD_LENGTH],
}

impl TableView<'_> {
    /// Funds of the deciding seat.
    pub fn own_funds(&self) -> i64 {
        self.funds[self.seat]
    }
}

/// Flattens a table view into network inputs.
///
/// The layout is fixed: for each seat, starting with the
/// deciding one and going round the table, its position,
/// funds and whether it retired; then for every tile, 1 if
/// the deciding seat owns it, 0.5 if a rival does and 0
/// otherwise; then the lot in question, one-hot; and last
/// its price.
pub struct TableEncoder;

impl TableEncoder {
    /// Length of an encoded view.
    pub const INPUTS: usize = SEATS * 3 + BOARD_LENGTH * 2 + 1;

    pub fn encode(table: &TableView<'_>, lot: usize) -> Vec<f32> {
        let mut inputs = Vec::with_capacity(Self::INPUTS);
        let seats = table.funds.len();
        for offset in 0..SEATS {
            match (offset < seats).then(|| (table.seat + offset) % seats) {
                Some(seat) => inputs.extend([
                    table.positions[seat] as f32 / (BOARD_LENGTH - 1) as f32,
                    money(table.funds[seat]),
                    if table.retired[seat] { 1.0 } else { 0.0 },
                ]),
                None => inputs.extend([0.0, 0.0, 1.0]),
            }
        }
        inputs.extend(table.owners.iter().map(|owner| match owner {
            Some(o) if *o == table.seat => 1.0,
            Some(_) => 0.5,
            None => 0.0,
        }));
        inputs.extend((0..BOARD_LENGTH).map(|i| if i == lot { 1.0 } else { 0.0 }));
        inputs.push(money(COSTS[lot] as i64));
        inputs
    }
}

/// Normalizes an amount of money into [0, 1].
fn money(amount: i64) -> f32 {
    (amount as f32 / MAX_BID).clamp(0.0, 1.0)
}

/// A seat driven by an evolved network.
///
/// Output 0 above one half means buy, output 1
/// scaled to [`MAX_BID`] is the bid.
#[derive(Clone, Debug)]
pub struct NetworkSeat {
    network: Network,
}

impl NetworkSeat {
    /// Index of the buy decision among the outputs.
    pub const BUY_OUTPUT: usize = 0;
    /// Index of the bid among the outputs.
    pub const BID_OUTPUT: usize = 1;
    /// Outputs a network needs.
    pub const OUTPUTS: usize = 2;

    pub fn network(&self) -> &Network {
        &self.network
    }

    fn decide(&self, table: &TableView<'_>, lot: usize, output: usize) -> f32 {
        self.network.evaluate(&TableEncoder::encode(table, lot))[output]
    }
}

impl From<&NNGenome> for NetworkSeat {
    fn from(genome: &NNGenome) -> NetworkSeat {
        NetworkSeat {
            network: Network::from(genome),
        }
    }
}

impl Seat for NetworkSeat {
    fn decide_buy(&self, table: &TableView<'_>, lot: usize) -> bool {
        self.decide(table, lot, Self::BUY_OUTPUT) > 0.5
    }

    fn decide_bid(&self, table: &TableView<'_>, lot: usize) -> u32 {
        (self.decide(table, lot, Self::BID_OUTPUT).clamp(0.0, 1.0) * MAX_BID) as u32
    }
}

/// A heuristic seat that buys and bids list price
/// as long as it keeps a cash reserve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThriftySeat {
    pub reserve: i64,
}

impl Default for ThriftySeat {
    fn default() -> ThriftySeat {
        ThriftySeat { reserve: 100 }
    }
}

impl Seat for ThriftySeat {
    fn decide_buy(&self, table: &TableView<'_>, lot: usize) -> bool {
        table.own_funds() - COSTS[lot] as i64 >= self.reserve
    }

    fn decide_bid(&self, table: &TableView<'_>, lot: usize) -> u32 {
        if self.decide_buy(table, lot) {
            COSTS[lot]
        } else {
            0
        }
    }
}
