//! Docent Tour Demo
//!
//! Drives a scripted three-chapter tour end to end: scripted accelerometer
//! samples flow through the sensor link, forward swings advance the camera
//! anchor by anchor, and the chapter button crosses into the next chapter
//! behind a screen fade. Runs a 60 fps frame loop on wall-clock time.

use std::collections::HashSet;
use std::time::Duration;

use docent_core::{Quat, SessionTime, Vec3};
use docent_gesture::{SensorLink, SwingConfig};
use docent_motion::{shared_fade, ProgressionConfig, ProgressionSession, TransitionMode};
use docent_scene::{hint_report, Anchor, AnchorChapter, ChapterSet, Hotspot};
use docent_test::{scenarios, ScriptedAccelerometer};
use tracing::info;

const HALF_FOV_DEG: f32 = 30.0;

fn chapters() -> ChapterSet {
    let hall = AnchorChapter::new(vec![
        Anchor::at(Vec3::new(0.0, 1.6, 0.0)),
        Anchor::new(Vec3::new(2.0, 1.6, -1.0), Quat::from_euler(25.0, 0.0, 0.0)),
        Anchor::new(Vec3::new(4.0, 1.6, -2.5), Quat::from_euler(50.0, 0.0, 0.0)),
    ])
    .with_hotspots(vec![Hotspot::new("fresco", Vec3::new(-3.0, 2.0, -4.0))])
    .with_default(true);

    let courtyard = AnchorChapter::new(vec![
        Anchor::at(Vec3::new(20.0, 1.6, 0.0)),
        Anchor::new(Vec3::new(22.0, 1.6, -2.0), Quat::from_euler(-30.0, 0.0, 0.0)),
    ])
    .with_order(1);

    let gallery = AnchorChapter::new(vec![Anchor::at(Vec3::new(40.0, 1.6, 0.0))]).with_order(2);

    ChapterSet::bootstrap(vec![hall, courtyard, gallery])
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("docent tour demo - forward swings drive the camera");
    println!();

    let mut link =
        SensorLink::connect(ScriptedAccelerometer::new(), SwingConfig::default()).await?;
    let events = link.events()?;

    let fade = shared_fade();
    let config = ProgressionConfig {
        transition_mode: TransitionMode::FadeAndTeleport,
        ..ProgressionConfig::default()
    };
    let mut session = ProgressionSession::new(config, Box::new(fade.clone()), events);
    session.start(chapters());

    // Two forward flicks far enough apart to both trigger
    let samples = scenarios::separated_swings(42).samples(SessionTime::from_millis(200));
    let mut next = 0;

    let visited = HashSet::new();
    let mut interval = tokio::time::interval(Duration::from_micros(16_667));
    let started = tokio::time::Instant::now();
    let mut last_at = (usize::MAX, usize::MAX);
    let mut requested = false;

    while started.elapsed() < Duration::from_secs(10) {
        interval.tick().await;
        let elapsed_ms = started.elapsed().as_millis() as i64;

        while next < samples.len() && samples[next].timestamp.as_millis() <= elapsed_ms {
            link.handle_sample(samples[next]);
            next += 1;
        }

        session.update()?;

        let controller = session.controller();
        let at = (
            controller.active_chapter_index(),
            controller.active_anchor_index(),
        );
        if at != last_at && !controller.is_advancing() {
            last_at = at;
            info!(chapter = at.0, anchor = at.1, "camera arrived");

            if let Some(chapter) = controller.active_chapter() {
                let hints = hint_report(&controller.pose(), chapter, HALF_FOV_DEG, &visited);
                if hints.left || hints.right {
                    info!(left = hints.left, right = hints.right, "hotspot hints");
                }
            }
        }

        // First chapter fully toured: press the chapter button once
        if !requested && at == (0, 2) && !controller.is_advancing() {
            info!(fade = fade.lock().alpha(), "advancing to the next chapter");
            session.request_next_chapter()?;
            requested = true;
        }
    }

    let controller = session.controller();
    let pose = controller.pose();
    println!();
    println!(
        "final: chapter {} anchor {} at ({:.2}, {:.2}, {:.2})",
        controller.active_chapter_index(),
        controller.active_anchor_index(),
        pose.position.x,
        pose.position.y,
        pose.position.z,
    );

    session.shutdown();
    Ok(())
}
