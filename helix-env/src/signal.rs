// This file is part of helix, an interactive Unix command interpreter.
// Copyright (C) 2026 The helix developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Signal catching.
//!
//! The kernel delivers signals asynchronously, so the handler installed for
//! caught signals must restrict itself to async-signal-safe operations. The
//! handler here only writes the signal number into a static array of atomic
//! slots; the read-eval loop drains the slots at prompt boundaries with
//! [`take_caught_signals`] and reacts outside of signal context. The slots
//! thus act as a lock-free channel between the handler and the loop.

use libc::c_int;
use nix::sys::signal::Signal;
use std::sync::atomic::{compiler_fence, AtomicIsize, Ordering};

/// Array of slots to store caught signals.
///
/// All slots are initialized with 0, which indicates that the slot is
/// available. When a signal is caught, the signal number is written into one
/// of the unoccupied slots.
static CAUGHT_SIGNALS: [AtomicIsize; 8] = [const { AtomicIsize::new(0) }; 8];

/// Signal catching function.
///
/// This function is installed as the handler for every signal the shell
/// catches. It writes the signal number into one of the slots in
/// [`CAUGHT_SIGNALS`].
pub(crate) extern "C" fn catch_signal(signal: c_int) {
    // Only async-signal-safe operations are allowed here.

    // Find an unused slot (having a value of 0) and write the signal number
    // into it. If a slot already holds this signal, do nothing. If no slot is
    // available, the signal is lost.
    let signal = signal as isize;
    for slot in &CAUGHT_SIGNALS {
        match slot.compare_exchange(0, signal, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => break,
            Err(slot_value) if slot_value == signal => break,
            _ => continue,
        }
    }
}

/// Drains the signals caught since the last call.
///
/// Unknown signal numbers are ignored.
pub fn take_caught_signals() -> Vec<Signal> {
    let mut signals = Vec::new();
    for slot in &CAUGHT_SIGNALS {
        // Need a fence to ensure we examine the slots in order.
        compiler_fence(Ordering::Acquire);

        let signal = slot.swap(0, Ordering::Relaxed);
        if signal == 0 {
            // The handler always fills the first unused slot, so there is no
            // more slot filled with a signal.
            break;
        }

        if let Ok(signal) = Signal::try_from(signal as c_int) {
            signals.push(signal);
        }
    }
    signals
}
