use error_strata::prelude::*;
use tracing::Level;

fn charge(amount: u64) -> RecordResult<()> {
    let builder = ErrorBuilder::new().in_current_span().code("card_declined").with("amount", amount);
    Err(record!(builder => "charge of {} declined", amount))
}

fn main() {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let span = tracing::info_span!("checkout", order = 1042);
    let _entered = span.enter();

    if let Err(err) = charge(2500) {
        err.emit();
        err.emit_at(Level::WARN);
    }

    let _ = ErrorBuilder::new().recover(|| -> () { panic!("worker crashed") });
}
