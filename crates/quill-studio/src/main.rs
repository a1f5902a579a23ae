use anyhow::{Context, Result};

use quill_engine::coords::{Color, Vec2, Viewport};
use quill_engine::device::{Gpu, GpuInit};
use quill_engine::geometry;
use quill_engine::logging::{init_logging, LoggingConfig};
use quill_engine::render::{WgpuDevice, WgpuDeviceConfig};
use quill_engine::{ShapeId, ShapeList, ShapeListConfig};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const FRAMES: u32 = 8;
const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let gpu = pollster::block_on(Gpu::new_headless(GpuInit::default()))
        .context("GPU initialization failed")?;
    let target = gpu.create_target(WIDTH, HEIGHT, FORMAT)?;

    let config = WgpuDeviceConfig::new(target.format, Viewport::new(WIDTH as f32, HEIGHT as f32))
        .with_clear_color(wgpu::Color {
            r: 0.02,
            g: 0.02,
            b: 0.05,
            a: 1.0,
        });
    let mut device = WgpuDevice::new(gpu.device(), gpu.queue(), config);

    let mut list = ShapeList::with_config(ShapeListConfig {
        label: Some("studio".into()),
        ..ShapeListConfig::default()
    });
    let doomed = populate(&mut list).context("failed to build the demo scene")?;
    log::info!("{} shapes in {} batches", list.len(), list.batches().len());

    for frame in 0..FRAMES {
        list.move_by(4.0, 2.0);
        list.set_angle(frame as f32 * 5.0);

        if frame == FRAMES / 2 {
            for id in &doomed {
                list.remove(*id)?;
            }
            log::info!("removed {} shapes; {} left", doomed.len(), list.len());
        }

        let stats = list.draw(&mut device)?;

        let mut encoder = gpu.create_encoder();
        device.encode(&mut encoder, &target.view);
        gpu.submit(encoder);

        log::info!(
            "frame {frame}: {} shapes, {} draw calls, {} batches repacked",
            stats.shapes,
            stats.draw_calls,
            stats.batches_packed,
        );
    }

    Ok(())
}

/// Fills the list with a grid of mixed shapes. Returns the ids removed
/// halfway through the run.
fn populate(list: &mut ShapeList<wgpu::Buffer>) -> quill_engine::Result<Vec<ShapeId>> {
    let palette = [Color::RED, Color::GREEN, Color::BLUE, Color::rgb(255, 200, 0)];
    let mut doomed = Vec::new();

    for row in 0..4 {
        for col in 0..6 {
            let center = Vec2::new(60.0 + col as f32 * 110.0, 60.0 + row as f32 * 120.0);
            let color = palette[(row + col) % palette.len()];

            let id = match (row + col) % 5 {
                0 => list.append(geometry::rectangle_filled(center, 60.0, 40.0, color, 15.0)?)?,
                1 => list.append(geometry::rectangle_outline(
                    center, 60.0, 40.0, color, 2.0, 0.0,
                )?)?,
                2 => list.append(geometry::ellipse_filled(center, 30.0, 20.0, color, 0.0, 32)?)?,
                3 => list.append(geometry::ellipse_filled_with_colors(
                    center,
                    30.0,
                    30.0,
                    color,
                    Color::WHITE,
                    0.0,
                    24,
                )?)?,
                _ => list.append(geometry::line(
                    center - Vec2::new(30.0, 30.0),
                    center + Vec2::new(30.0, 30.0),
                    color,
                    1.0,
                )?)?,
            };

            if col == 5 {
                doomed.push(id);
            }
        }
    }

    let star: Vec<Vec2> = (0..5)
        .map(|i| Vec2::new(700.0, 500.0) + Vec2::new(0.0, -50.0).rotated(i as f32 * 144.0))
        .collect();
    list.append(geometry::line_loop(&star, Color::WHITE, 1.0)?)?;
    list.append(geometry::polygon(
        &[
            Vec2::new(600.0, 520.0),
            Vec2::new(660.0, 500.0),
            Vec2::new(680.0, 560.0),
            Vec2::new(620.0, 580.0),
        ],
        Color::rgba(0, 200, 255, 160),
        1.0,
    )?)?;

    Ok(doomed)
}
