#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Replays AIS position reports loaded from GeoJSON and CSV exports. Every change to the
//! playback state is published as a [playback::Snapshot] to any number of subscribers.

pub mod error;
pub mod playback;
pub mod settings;
pub mod source;
pub mod startup;
