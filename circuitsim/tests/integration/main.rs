// Integration tests follow the organization suggested by Matklad:
// https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod combinational;
mod netlist_errors;
#[cfg(not(miri))]
mod pacing;
mod sequential;
