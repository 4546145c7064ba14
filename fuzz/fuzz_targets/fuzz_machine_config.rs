#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sitecrypt::resolver::machine_config::find_machine_key;

#[derive(Arbitrary, Debug)]
struct MachineConfigFuzzInput {
    document: String,
    site_name: String,
}

fuzz_target!(|input: MachineConfigFuzzInput| {
    // Malformed documents must surface as errors, never panics
    let _ = find_machine_key(&input.document, &input.site_name);
});
