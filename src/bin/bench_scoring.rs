use std::time::Instant;
use pose_match::pose::PoseName;
use pose_match::scoring::similarity;
use anyhow::Result;

fn main() -> Result<()> {
    let user = PoseName::Warrior.pose();
    let target = PoseName::Archer.pose();

    // 採点のみを10万回計測
    let start = Instant::now();
    let iterations = 100_000;
    let mut acc = 0.0f32;
    for _ in 0..iterations {
        acc += similarity(std::hint::black_box(user.as_slice()), target.as_slice());
    }
    let elapsed = start.elapsed();

    let avg_us = elapsed.as_micros() as f64 / iterations as f64;
    let per_frame_budget = 1_000_000.0 / 60.0;

    println!("Pose similarity: {:.3}us/call ({:.4}% of a 60 FPS frame)", avg_us, avg_us / per_frame_budget * 100.0);
    println!("Checksum: {:.4}", acc / iterations as f32);

    Ok(())
}
