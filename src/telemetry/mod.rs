pub(crate) mod oltp;

pub use oltp::init_meter;

use opentelemetry::global;
use opentelemetry::metrics::Meter;

pub fn get_meter() -> Meter {
    global::meter_provider().meter("mcstatus")
}
