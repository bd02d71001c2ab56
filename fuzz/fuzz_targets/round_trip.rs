#![no_main]

use bitfield_stream::fuzz::round_trip::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: FuzzCase| harness(data));
