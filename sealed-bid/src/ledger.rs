//! Per-lot bookkeeping across every episode of a run.
use crate::board::{self, BOARD_LENGTH, COSTS};

use neatarena::Statistics;
use serde::{Deserialize, Serialize};

use std::fmt;

/// Counts bids and wins by lot.
///
/// A win is recorded for every lot the winner of an
/// episode held when it ended, so lots that show up in
/// winning hands more often get higher win ratios.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    bids: Vec<u64>,
    money: Vec<u64>,
    wins: Vec<u64>,
}

impl Ledger {
    /// Returns an empty ledger.
    pub fn new() -> Ledger {
        Ledger {
            bids: vec![0; BOARD_LENGTH],
            money: vec![0; BOARD_LENGTH],
            wins: vec![0; BOARD_LENGTH],
        }
    }

    /// Number of bids made on `lot`.
    pub fn bids(&self, lot: usize) -> u64 {
        self.bids[lot]
    }

    /// Mean bid made on `lot`, or 0 if none was made.
    pub fn average_bid(&self, lot: usize) -> f32 {
        match self.bids[lot] {
            0 => 0.0,
            n => self.money[lot] as f32 / n as f32,
        }
    }

    /// Mean bid on `lot` relative to its list price.
    pub fn price_ratio(&self, lot: usize) -> f32 {
        match COSTS[lot] {
            0 => 0.0,
            cost => self.average_bid(lot) / cost as f32,
        }
    }

    /// Number of episodes won while holding `lot`.
    pub fn wins(&self, lot: usize) -> u64 {
        self.wins[lot]
    }

    /// Wins of `lot` rescaled between the least and most
    /// winning lots that won at all, into [0, 1].
    ///
    /// Lots that never won, and every lot when all winning
    /// lots won equally often, have a ratio of 0.
    pub fn win_ratio(&self, lot: usize) -> f32 {
        let won = self.wins.iter().copied().filter(|w| *w > 0);
        let (least, most) = won.fold((u64::MAX, 0), |(lo, hi), w| (lo.min(w), hi.max(w)));
        if self.wins[lot] == 0 || most == least {
            0.0
        } else {
            (self.wins[lot] - least) as f32 / (most - least) as f32
        }
    }

    /// Returns whether anything was recorded.
    pub fn is_empty(&self) -> bool {
        self.bids.iter().chain(&self.wins).all(|n| *n == 0)
    }
}

impl Default for Ledger {
    fn default() -> Ledger {
        Ledger::new()
    }
}

/// Items off the board are ignored.
impl Statistics for Ledger {
    fn mark_win(&mut self, item: usize) {
        if let Some(wins) = self.wins.get_mut(item) {
            *wins += 1;
        }
    }

    fn make_bid(&mut self, item: usize, amount: u32) {
        if let (Some(bids), Some(money)) = (self.bids.get_mut(item), self.money.get_mut(item)) {
            *bids += 1;
            *money += amount as u64;
        }
    }
}

/// One row per lot.
impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "lot  bids  average  price  wins  ratio")?;
        for lot in (0..BOARD_LENGTH).filter(|l| board::is_lot(*l)) {
            writeln!(
                f,
                "{:>3}  {:>4}  {:>7.1}  {:>5.2}  {:>4}  {:>5.2}",
                lot,
                self.bids(lot),
                self.average_bid(lot),
                self.price_ratio(lot),
                self.wins(lot),
                self.win_ratio(lot),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_and_prices() {
        let mut ledger = Ledger::new();
        assert!(ledger.is_empty());
        ledger.make_bid(1, 30);
        ledger.make_bid(1, 90);
        assert_eq!(ledger.bids(1), 2);
        assert_eq!(ledger.average_bid(1), 60.0);
        assert_eq!(ledger.price_ratio(1), 1.0);
        assert_eq!(ledger.average_bid(3), 0.0);
        assert!(!ledger.is_empty());
    }

    #[test]
    fn win_ratios_span_the_winning_lots() {
        let mut ledger = Ledger::new();
        for (lot, wins) in [(1, 1), (3, 3), (5, 5)] {
            for _ in 0..wins {
                ledger.observe(neatarena::Observation::Win { item: lot });
            }
        }
        assert_eq!(ledger.win_ratio(1), 0.0);
        assert_eq!(ledger.win_ratio(3), 0.5);
        assert_eq!(ledger.win_ratio(5), 1.0);
        assert_eq!(ledger.win_ratio(6), 0.0);
    }

    #[test]
    fn equal_wins_have_no_spread() {
        let mut ledger = Ledger::new();
        ledger.mark_win(1);
        ledger.mark_win(3);
        assert_eq!(ledger.win_ratio(1), 0.0);
        assert_eq!(ledger.win_ratio(3), 0.0);
    }

    #[test]
    fn items_off_the_board_are_ignored() {
        let mut ledger = Ledger::new();
        ledger.mark_win(BOARD_LENGTH);
        ledger.make_bid(usize::MAX, 100);
        assert!(ledger.is_empty());
        assert_eq!(ledger, Ledger::new());
    }

    #[test]
    fn report_lists_every_lot() {
        let report = Ledger::new().to_string();
        assert_eq!(report.lines().count(), 1 + 28);
    }

    #[test]
    fn serde() {
        let mut ledger = Ledger::new();
        ledger.make_bid(39, 400);
        ledger.mark_win(39);
        let json = serde_json::to_string(&ledger).unwrap();
        assert_eq!(serde_json::from_str::<Ledger>(&json).unwrap(), ledger);
    }
}
