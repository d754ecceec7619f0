//! Drives an emulated Android navigation bar from the command line.
//!
//! ```text
//! cargo run -p core-navbar --example emulated_device
//! ```

use bridge_desktop::EmulatedNavigationBar;
use bridge_traits::{LogLevel, RuntimeTarget, Visibility};
use core_navbar::NavigationBar;
use core_runtime::config::{NavigationBarAppearance, NavigationBarConfig};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(
        LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_level(LogLevel::Debug),
    )?;

    let device = EmulatedNavigationBar::new();
    let config = NavigationBarConfig::builder()
        .target(RuntimeTarget::Android)
        .surface(Arc::new(device.clone()))
        .appearance(NavigationBarAppearance::from_json(
            r##"{ "backgroundColor": "#121212", "barStyle": "dark", "position": "absolute" }"##,
        )?)
        .build()?;

    let bar = NavigationBar::from_config(&config)?;
    if let Some(appearance) = &config.appearance {
        bar.apply_appearance(appearance).await?;
    }

    let pump = bar.attach_native().await?;
    let observer = bar.observe_visibility();
    let mut changes = observer.subscribe();

    changes.changed().await?;
    println!("initial visibility: {:?}", *changes.borrow_and_update());

    device.simulate_user_visibility(Visibility::Hidden).await;
    changes.changed().await?;
    println!("after swipe: {:?}", *changes.borrow_and_update());

    for value in bar.snapshot().await? {
        println!("{}", serde_json::to_string(&value)?);
    }

    observer.deactivate().await;
    if let Some(pump) = pump {
        pump.stop().await;
    }

    // The same calls on iOS only log an advisory notice.
    let ios = NavigationBarConfig::builder()
        .target(RuntimeTarget::Ios)
        .surface(Arc::new(device))
        .build()?;
    let inert = NavigationBar::from_config(&ios)?;
    inert.set_background_color("tomato").await?;
    println!("ios visibility: {}", inert.get_visibility().await?);

    Ok(())
}
