//! Evolves sealed-bid auction players by tournament.
//!
//! Every generation, networks are seated four to a table and
//! play thousands of auction episodes; the best of each table
//! advances until one champion remains. The population then
//! evolves and a RON checkpoint is written, so a run can be
//! stopped and resumed at any generation boundary.
pub mod auction;
pub mod board;
pub mod ledger;
pub mod seats;
pub mod settings;
pub mod storage;
