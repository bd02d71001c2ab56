#![no_main]

use bitfield_stream::fuzz::fixed_capacity::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: FuzzCase| harness(data));
