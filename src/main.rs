use amortize::{amortize, Compounding, Rate};
use chrono::NaiveDate;
use log::info;
use rust_decimal_macros::dec;
use simple_logger::SimpleLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()?;

    let rate = Rate::from_annual(dec!(0.06), Compounding::Monthly, 360)?;
    let loan = amortize(dec!(200000), &rate)?;
    info!(
        "{} periods at {}, total interest {}",
        loan.period_count(),
        loan.payment(),
        loan.total_interest()
    );

    let first = NaiveDate::from_ymd_opt(2024, 4, 1).ok_or("invalid first payment date")?;
    for (date, period) in loan.payment_dates(first)?.iter().zip(loan.periods()) {
        println!("{} {}", date, period);
    }
    Ok(())
}

// schedules and rates can be handed across threads
#[cfg(test)]
fn is_normal<T: Sized + Send + Sync + Unpin>() {}

#[test]
fn normal_types() {
    is_normal::<amortize::Period>();
    is_normal::<amortize::Amortization>();
    is_normal::<amortize::Rate>();
}
