use cfg_aliases::cfg_aliases;

fn main() {
    cfg_aliases! {
        // Log through defmt only when running on the MCU. Host builds (unit tests) have no
        // global defmt logger to link against.
        defmt_log: { all(target_os = "none", not(test)) },
        // Real registers are only reachable with a PAC selected.
        mmio: { any(feature = "f030", feature = "f051", feature = "f072") },
    }
}
