/* =======================================================================
Rustic is a chess playing engine.
Copyright (C) 2019-2024, Marcel Vanthoor
https://rustic-chess.org/

Rustic is written in the Rust programming language. It is an original
work, not derived from any engine that came before it. However, it does
use a lot of concepts which are well-known and are in use by most if not
all classical alpha/beta-based chess engines.

Rustic is free software: you can redistribute it and/or modify it under
the terms of the GNU General Public License version 3 as published by
the Free Software Foundation.

Rustic is distributed in the hope that it will be useful, but WITHOUT
ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License
for more details.

You should have received a copy of the GNU General Public License along
with this program.  If not, see <http://www.gnu.org/licenses/>.
======================================================================= */

use rustic_sharp::engine::Engine;

#[cfg(feature = "extra")]
fn run_extra_tools() -> bool {
    use rustic_sharp::misc::cmdline::CmdLine;

    let cmdline = CmdLine::new();
    if cmdline.has_wizardry() {
        rustic_sharp::extra::run_wizardry();
        return true;
    }
    if cmdline.has_test() {
        rustic_sharp::extra::run_epd_suite();
        return true;
    }
    false
}

#[cfg(not(feature = "extra"))]
fn run_extra_tools() -> bool {
    false
}

fn main() {
    if run_extra_tools() {
        return;
    }

    let mut engine = Engine::new();

    if let Err(e) = engine.run() {
        println!("info string {e}");
        std::process::exit(1);
    }
}
