//! A sealed-bid lot auction played around a ring of tiles.
use crate::{
    board::{self, Tile, BOARD_LENGTH, COSTS, LAP_BONUS, SEATS, STALEMATE_TURN, STARTING_FUNDS},
    seats::{Seat, TableView},
};

use neatarena::{Environment, EnvironmentFactory, Observation, Outcome};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

/// One episode at an auction table.
///
/// Each [`step`] is one turn of the seat to move: it rolls two
/// dice, moves, collects [`LAP_BONUS`] when passing the start
/// and resolves the tile it lands on. An unowned lot is either
/// bought at list price or auctioned to the highest sealed bid;
/// an owned lot charges rent; tax tiles charge their tax. A seat
/// whose funds drop below zero retires and its lots return to
/// the bank. The last seat standing wins; after
/// [`STALEMATE_TURN`] turns the episode is a draw.
///
/// [`step`]: Environment::step
pub struct Auction<'a, P: ?Sized> {
    seats: Vec<&'a P>,
    funds: Vec<i64>,
    positions: Vec<usize>,
    retired: Vec<bool>,
    owners: [Option<usize>; BOARD_LENGTH],
    remaining: usize,
    current: usize,
    turn: usize,
    rng: StdRng,
    observations: Vec<Observation>,
}

impl<'a, P: Seat + ?Sized> Auction<'a, P> {
    /// Seats `seats` in the given order, with all
    /// randomness drawn from `seed`.
    pub fn new(seats: &[&'a P], seed: u64) -> Auction<'a, P> {
        let count = seats.len();
        Auction {
            seats: seats.to_vec(),
            funds: vec![STARTING_FUNDS; count],
            positions: vec![0; count],
            retired: vec![false; count],
            owners: [None; BOARD_LENGTH],
            remaining: count,
            current: 0,
            turn: 0,
            rng: StdRng::seed_from_u64(seed),
            observations: vec![],
        }
    }

    /// Steps until the episode ends.
    pub fn play_out(&mut self) -> Outcome {
        loop {
            match self.step() {
                Outcome::Ongoing => continue,
                outcome => return outcome,
            }
        }
    }

    /// Returns the funds of every seat.
    pub fn funds(&self) -> &[i64] {
        &self.funds
    }

    /// Returns the owner of every tile.
    pub fn owners(&self) -> &[Option<usize>; BOARD_LENGTH] {
        &self.owners
    }

    /// Returns the number of turns played.
    pub fn turn(&self) -> usize {
        self.turn
    }

    /// Returns whether a seat has retired.
    pub fn is_retired(&self, seat: usize) -> bool {
        self.retired[seat]
    }

    /// Returns the lots held by `seat`.
    pub fn holdings(&self, seat: usize) -> Vec<usize> {
        (0..BOARD_LENGTH)
            .filter(|lot| self.owners[*lot] == Some(seat))
            .collect()
    }

    fn view(&self, seat: usize) -> TableView<'_> {
        TableView {
            seat,
            funds: &self.funds,
            positions: &self.positions,
            retired: &self.retired,
            owners: &self.owners,
        }
    }

    /// Moves `seat` by `roll` tiles and resolves where it lands.
    fn advance(&mut self, seat: usize, roll: usize) {
        let target = self.positions[seat] + roll;
        if target >= BOARD_LENGTH {
            self.funds[seat] += LAP_BONUS;
        }
        self.positions[seat] = target % BOARD_LENGTH;
        self.land(seat, roll as u32);
    }

    fn land(&mut self, seat: usize, roll: u32) {
        let position = self.positions[seat];
        match board::tile(position) {
            Tile::Lot(_) => match self.owners[position] {
                None => {
                    let cost = COSTS[position] as i64;
                    let buys = self.seats[seat].decide_buy(&self.view(seat), position);
                    if buys && self.funds[seat] >= cost {
                        self.charge(seat, cost);
                        self.owners[position] = Some(seat);
                    } else {
                        self.auction(position);
                    }
                }
                Some(owner) if owner != seat => {
                    let due = board::rent(position, &self.holdings(owner), roll) as i64;
                    self.funds[owner] += due;
                    self.charge(seat, due);
                }
                Some(_) => {}
            },
            Tile::Tax(tax) => self.charge(seat, tax as i64),
            Tile::Empty => {}
        }
    }

    /// Sells `lot` to the highest sealed bid.
    ///
    /// Bids above the bidder's funds are discarded. Ties are
    /// broken at random; if every bid was discarded, a random
    /// active seat receives the lot for free.
    fn auction(&mut self, lot: usize) {
        let mut bids = Vec::with_capacity(self.seats.len());
        for seat in (0..self.seats.len()).filter(|s| !self.retired[*s]) {
            let amount = self.seats[seat].decide_bid(&self.view(seat), lot);
            self.observations.push(Observation::Bid { item: lot, amount });
            if amount as i64 <= self.funds[seat] {
                bids.push((seat, amount));
            }
        }
        let highest = bids.iter().map(|(_, amount)| *amount).max().unwrap_or(0);
        let candidates: Vec<usize> = bids
            .iter()
            .filter(|(_, amount)| *amount == highest)
            .map(|(seat, _)| *seat)
            .collect();
        if let Some(winner) = candidates.choose(&mut self.rng).copied() {
            self.charge(winner, highest as i64);
            self.owners[lot] = Some(winner);
        } else {
            let active: Vec<usize> = (0..self.seats.len()).filter(|s| !self.retired[*s]).collect();
            self.owners[lot] = active.choose(&mut self.rng).copied();
        }
    }

    /// Deducts `amount` from `seat`, retiring it if
    /// that leaves it in debt.
    fn charge(&mut self, seat: usize, amount: i64) {
        self.funds[seat] -= amount;
        if self.funds[seat] < 0 {
            for owner in self.owners.iter_mut().filter(|o| **o == Some(seat)) {
                *owner = None;
            }
            self.retired[seat] = true;
            self.remaining -= 1;
        }
    }

    /// Passes the turn to the next active seat.
    fn pass_turn(&mut self) {
        let count = self.seats.len();
        for offset in 1..=count {
            let next = (self.current + offset) % count;
            if !self.retired[next] {
                self.current = next;
                return;
            }
        }
    }

    fn outcome(&mut self) -> Outcome {
        if self.remaining <= 1 {
            match (0..self.seats.len()).find(|s| !self.retired[*s]) {
                Some(winner) => {
                    let lots = self.holdings(winner);
                    self.observations
                        .extend(lots.into_iter().map(|item| Observation::Win { item }));
                    Outcome::Win(winner)
                }
                None => Outcome::Draw,
            }
        } else if self.turn >= STALEMATE_TURN {
            Outcome::Draw
        } else {
            Outcome::Ongoing
        }
    }
}

impl<P: Seat + ?Sized> Environment for Auction<'_, P> {
    fn step(&mut self) -> Outcome {
        if self.remaining > 1 && self.turn < STALEMATE_TURN {
            let seat = self.current;
            let roll = self.rng.gen_range(1..=6) + self.rng.gen_range(1..=6);
            self.advance(seat, roll);
            self.turn += 1;
            self.pass_turn();
        }
        self.outcome()
    }

    fn observations(&mut self) -> Vec<Observation> {
        std::mem::take(&mut self.observations)
    }
}

/// Opens an [`Auction`] for every table.
#[derive(Clone, Copy, Debug, Default)]
pub struct AuctionFactory;

impl<P: Seat + Sync> EnvironmentFactory<P> for AuctionFactory {
    fn open<'a>(&'a self, seats: &[&'a P], seed: u64) -> Box<dyn Environment + 'a> {
        Box::new(Auction::new(seats, seed))
    }
}

/// Seats `contender` against [`SEATS`]` - 1` copies of `rival`
/// for `episodes` episodes, at a random seat each time, and
/// returns how many episodes it won.
pub fn benchmark<R: Rng>(contender: &dyn Seat, rival: &dyn Seat, episodes: usize, rng: &mut R) -> usize {
    let mut wins = 0;
    for _ in 0..episodes {
        let seat = rng.gen_range(0..SEATS);
        let mut seats = vec![rival; SEATS];
        seats[seat] = contender;
        if Auction::new(&seats, rng.gen()).play_out() == Outcome::Win(seat) {
            wins += 1;
        }
    }
    wins
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seats::ThriftySeat;

    /// Never buys, bids a fixed amount.
    struct Bidder(u32);

    impl Seat for Bidder {
        fn decide_buy(&self, _: &TableView<'_>, _: usize) -> bool {
            false
        }

        fn decide_bid(&self, _: &TableView<'_>, _: usize) -> u32 {
            self.0
        }
    }

    #[test]
    fn highest_bid_takes_the_lot() {
        let (low, high) = (Bidder(10), Bidder(90));
        let mut auction = Auction::new(&[&low, &high, &low], 0);
        auction.auction(1);
        assert_eq!(auction.owners()[1], Some(1));
        assert_eq!(auction.funds(), &[1500, 1410, 1500]);
        assert_eq!(
            auction.observations(),
            vec![
                Observation::Bid { item: 1, amount: 10 },
                Observation::Bid { item: 1, amount: 90 },
                Observation::Bid { item: 1, amount: 10 },
            ]
        );
        assert!(auction.observations().is_empty());
    }

    #[test]
    fn bids_above_funds_are_discarded() {
        let (modest, reckless) = (Bidder(50), Bidder(5000));
        let mut auction = Auction::new(&[&reckless, &modest], 0);
        auction.auction(39);
        assert_eq!(auction.owners()[39], Some(1));
        assert_eq!(auction.funds(), &[1500, 1450]);
    }

    #[test]
    fn unbid_lot_is_given_away() {
        let silent = Bidder(0);
        let mut auction = Auction::new(&[&silent, &silent], 3);
        auction.auction(6);
        assert!(auction.owners()[6].is_some());
        assert_eq!(auction.funds(), &[1500, 1500]);
    }

    #[test]
    fn debt_retires_a_seat_and_frees_its_lots() {
        let seat = ThriftySeat::default();
        let mut auction = Auction::new(&[&seat, &seat], 0);
        auction.owners[1] = Some(0);
        auction.owners[3] = Some(0);
        auction.charge(0, STARTING_FUNDS + 1);
        assert!(auction.is_retired(0));
        assert!(auction.holdings(0).is_empty());
        assert_eq!(auction.outcome(), Outcome::Win(1));
    }

    #[test]
    fn winner_reports_its_lots() {
        let seat = ThriftySeat::default();
        let mut auction = Auction::new(&[&seat, &seat], 0);
        auction.owners[5] = Some(1);
        auction.owners[9] = Some(1);
        auction.charge(0, STARTING_FUNDS + 1);
        assert_eq!(auction.step(), Outcome::Win(1));
        assert_eq!(
            auction.observations(),
            vec![Observation::Win { item: 5 }, Observation::Win { item: 9 }]
        );
    }

    #[test]
    fn episodes_end_by_the_stalemate_turn() {
        let seat = ThriftySeat::default();
        for seed in 0..20 {
            let mut auction = Auction::new(&[&seat, &seat, &seat, &seat], seed);
            let outcome = auction.play_out();
            assert!(auction.turn() <= STALEMATE_TURN);
            match outcome {
                Outcome::Draw => assert_eq!(auction.turn(), STALEMATE_TURN),
                Outcome::Win(winner) => assert!(!auction.is_retired(winner)),
                Outcome::Ongoing => unreachable!(),
            }
        }
    }

    #[test]
    fn same_seed_same_episode() {
        let seat = ThriftySeat::default();
        let mut first = Auction::new(&[&seat, &seat, &seat], 11);
        let mut second = Auction::new(&[&seat, &seat, &seat], 11);
        assert_eq!(first.play_out(), second.play_out());
        assert_eq!(first.funds(), second.funds());
        assert_eq!(first.owners(), second.owners());
    }

    #[test]
    fn passive_seat_loses_to_thrifty_rivals() {
        let mut rng = StdRng::seed_from_u64(5);
        let wins = benchmark(&Bidder(0), &ThriftySeat::default(), 20, &mut rng);
        assert!(wins < 20);
    }
}
