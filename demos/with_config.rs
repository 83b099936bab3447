use ostinato::{JobSpec, SchedulerBuilder, TimeUnit};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // Intervals come from demos/application.toml; the `reports` job is
    // disabled there and `metrics-flush` is overridden to 1500ms.
    let scheduler = SchedulerBuilder::with_toml("demos/application.toml")
        .job(
            JobSpec::builder("cache-warm", || println!("[cache-warm] warmed"))
                .every("${cache.warm_every:10s}")
                .build(),
        )
        .job(
            JobSpec::builder("reports", || println!("[reports] generated"))
                .every("30s")
                .build(),
        )
        .job(
            JobSpec::builder("metrics-flush", || println!("[metrics-flush] flushed"))
                .every("2000")
                .time_unit(TimeUnit::Milliseconds)
                .initial_delay("1s")
                .build(),
        )
        .start()?;

    println!("Running {} of 3 configured jobs.", scheduler.schedule_count());
    println!("Press Ctrl+C to stop...\n");

    tokio::signal::ctrl_c().await?;
    scheduler.shutdown();
    Ok(())
}
