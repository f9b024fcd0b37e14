//! Protoblock - headless prototype block session
//!
//! Attaches a prototype block to a scene entity, plays a short script of
//! editor edits against it and prints the child after every flush.
//!
//! Usage:
//!   cargo run --bin protoblock -- [--asset greybox.json] [--settings settings.json] [--policy clamp]

use std::path::PathBuf;

use glam::{Quat, Vec3};

use protoblock::asset::ConfigurationAsset;
use protoblock::core::{logging, Result};
use protoblock::prototype::{PrototypeSettings, Selection, ShapeIndexPolicy};
use protoblock::scene::{Material, SceneNodeId, Transform};
use protoblock::EditSession;

fn main() {
    logging::init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut settings = match parse_path_arg(&args, "--settings") {
        Some(path) => PrototypeSettings::load_sync(&path)?,
        None => PrototypeSettings::default(),
    };
    if let Some(policy) = parse_str_arg(&args, "--policy") {
        settings.shape_index_policy = parse_policy(&policy).unwrap_or_else(|| {
            log::warn!("Unknown policy '{}', keeping {:?}", policy, settings.shape_index_policy);
            settings.shape_index_policy
        });
    }

    let asset = match parse_path_arg(&args, "--asset") {
        Some(path) => ConfigurationAsset::load_sync(&path)?,
        None => default_asset(),
    };

    println!("=== Protoblock ===");
    println!("Asset:  {} ({} shapes, {} textures, {} colors)",
        asset.name, asset.shape_variants.len(), asset.textures.len(), asset.colors.len());
    println!("Policy: {:?}", settings.shape_index_policy);
    println!();

    let prototype_material = Material::new("prototype")
        .with_texture("checker")
        .with_slots(settings.texture_slot.clone(), settings.color_slot.clone());

    let mut session = EditSession::in_memory(settings);
    let host = session.host_mut();
    let material = host.add_material(prototype_material);
    for shape in &asset.shape_variants {
        host.register_shape(shape.as_str(), material);
    }
    let entity = host.spawn_entity(
        "prototype_block",
        Transform {
            position: Vec3::new(2.0, 0.0, 3.0),
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_4),
            scale: Vec3::ONE,
        },
    );
    let config = session.assets_mut().insert(asset);

    session.attach_with(entity, config, Selection::default())?;
    step(&mut session, entity, "attach");

    session.select_shape(entity, 1)?;
    session.select_texture(entity, 1)?;
    session.select_color(entity, 1)?;
    step(&mut session, entity, "burst of three edits");

    session.select_shape(entity, 99)?;
    step(&mut session, entity, "shape index 99");

    if let Some(asset) = session.assets_mut().get_mut(config) {
        asset.colors.push([0.1, 0.8, 0.3, 1.0]);
    }
    session.set_selection(entity, Selection::new(0, 0, 2))?;
    step(&mut session, entity, "asset gained a color");

    let outcome = session.update(entity)?;
    log::info!("Manual update: {:?}", outcome);
    step(&mut session, entity, "manual update");

    session.select_shape(entity, 2)?;
    session.detach(entity)?;
    step(&mut session, entity, "detach with resync pending");

    Ok(())
}

fn step(session: &mut EditSession, entity: SceneNodeId, label: &str) {
    let report = session.flush();
    log::info!(
        "{}: {} executed, {} stale, {} failed",
        label, report.executed, report.stale, report.failed
    );

    let child = session.node(entity).and_then(|n| n.current_child());
    let entries = session.host().graph().flatten();
    match child.and_then(|c| entries.iter().find(|e| e.node == c)) {
        Some(entry) => {
            let pos = entry.world.transform_point3(Vec3::ZERO);
            println!(
                "{:<28} shape={:<8} texture={:<8} color={:?} at ({:.1}, {:.1}, {:.1})",
                label,
                entry.template.as_str(),
                entry.texture.as_ref().map(|t| t.as_str()).unwrap_or("-"),
                entry.color,
                pos.x, pos.y, pos.z
            );
        }
        None => println!("{:<28} (no child)", label),
    }
}

fn default_asset() -> ConfigurationAsset {
    ConfigurationAsset::new("greybox")
        .with_shapes(["cube", "ramp", "pillar"])
        .with_textures(["grid", "bricks"])
        .with_colors([[0.9, 0.9, 0.9, 1.0], [0.8, 0.3, 0.2, 1.0]])
}

fn parse_policy(name: &str) -> Option<ShapeIndexPolicy> {
    serde_json::from_value(serde_json::Value::String(name.to_string())).ok()
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_path_arg(args: &[String], flag: &str) -> Option<PathBuf> {
    parse_str_arg(args, flag).map(PathBuf::from)
}
