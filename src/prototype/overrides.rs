//! Per-instance surface overrides.
//!
//! The selected texture and color are written into the instance renderer's
//! property block. Shared materials are never modified. An index past the end
//! of its list clears the slot so the material default shows through.

use super::node::Selection;
use super::settings::PrototypeSettings;
use crate::asset::{ConfigurationAsset, TextureHandle};
use crate::core::Rgba;
use crate::host::EditHost;
use crate::scene::SceneNodeId;

/// The overrides left on an instance after [`apply_overrides`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppliedOverrides {
    pub texture: Option<TextureHandle>,
    pub color: Option<Rgba>,
}

/// Write the selection's texture and color to `instance`.
///
/// Values are copied out of `asset`, so later edits to the asset do not
/// reach this instance until it is resynced. Returns `None` when the
/// instance has no renderer.
pub fn apply_overrides<H: EditHost + ?Sized>(
    host: &mut H,
    instance: SceneNodeId,
    asset: &ConfigurationAsset,
    selection: Selection,
    settings: &PrototypeSettings,
) -> Option<AppliedOverrides> {
    let Some(renderer) = host.renderer(instance) else {
        log::debug!("{:?} has no renderer, skipping overrides", instance);
        return None;
    };

    let texture = asset.texture(selection.texture).cloned();
    match &texture {
        Some(t) => host.set_override_texture(renderer, &settings.texture_slot, t),
        None => {
            if !asset.textures.is_empty() {
                log::debug!(
                    "Texture index {} out of range ({} textures), using material default",
                    selection.texture,
                    asset.textures.len()
                );
            }
            host.clear_override(renderer, &settings.texture_slot);
        }
    }

    let color = asset.color(selection.color);
    match color {
        Some(c) => host.set_override_color(renderer, &settings.color_slot, c),
        None => host.clear_override(renderer, &settings.color_slot),
    }

    Some(AppliedOverrides { texture, color })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SceneHost;
    use crate::scene::{Material, BASE_COLOR_SLOT, BASE_TEXTURE_SLOT};

    fn setup() -> (SceneHost, SceneNodeId, SceneNodeId) {
        let mut host = SceneHost::new();
        let mat = host.add_material(Material::new("proto").with_texture("checker"));
        let cube = host.register_shape("cube", mat);
        let a = host.instantiate(&cube).unwrap();
        let b = host.instantiate(&cube).unwrap();
        (host, a, b)
    }

    fn asset() -> ConfigurationAsset {
        ConfigurationAsset::new("greybox")
            .with_shapes(["cube"])
            .with_textures(["bricks", "planks"])
            .with_colors([[0.2, 0.4, 0.6, 1.0]])
    }

    fn selection(texture: usize, color: usize) -> Selection {
        Selection { shape: 0, texture, color }
    }

    #[test]
    fn test_applies_in_range_selection() {
        let (mut host, a, _) = setup();
        let applied =
            apply_overrides(&mut host, a, &asset(), selection(1, 0), &PrototypeSettings::default())
                .unwrap();

        assert_eq!(applied.texture.unwrap().as_str(), "planks");
        assert_eq!(applied.color, Some([0.2, 0.4, 0.6, 1.0]));

        let block = &host.graph().get(a).unwrap().renderer().unwrap().overrides;
        assert_eq!(block.texture(BASE_TEXTURE_SLOT).unwrap().as_str(), "planks");
        assert_eq!(block.color(BASE_COLOR_SLOT), Some([0.2, 0.4, 0.6, 1.0]));
    }

    #[test]
    fn test_out_of_range_leaves_material_default() {
        let (mut host, a, _) = setup();
        let applied =
            apply_overrides(&mut host, a, &asset(), selection(9, 4), &PrototypeSettings::default())
                .unwrap();
        assert_eq!(applied, AppliedOverrides::default());

        let entry = host.graph().flatten().into_iter().find(|e| e.node == a).unwrap();
        assert_eq!(entry.texture.unwrap().as_str(), "checker");
        assert_eq!(entry.color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_out_of_range_clears_earlier_override() {
        let (mut host, a, _) = setup();
        let settings = PrototypeSettings::default();
        apply_overrides(&mut host, a, &asset(), selection(0, 0), &settings);
        apply_overrides(&mut host, a, &asset(), selection(0, 3), &settings);

        let block = &host.graph().get(a).unwrap().renderer().unwrap().overrides;
        assert!(block.color(BASE_COLOR_SLOT).is_none());
        assert_eq!(block.texture(BASE_TEXTURE_SLOT).unwrap().as_str(), "bricks");
    }

    #[test]
    fn test_other_instances_unaffected() {
        let (mut host, a, b) = setup();
        apply_overrides(&mut host, a, &asset(), selection(0, 0), &PrototypeSettings::default());

        let block = &host.graph().get(b).unwrap().renderer().unwrap().overrides;
        assert!(block.is_empty());
        let material = host.graph().materials().get(crate::scene::MaterialId(0)).unwrap();
        assert_eq!(material.base_texture.as_ref().unwrap().as_str(), "checker");
    }

    #[test]
    fn test_later_asset_edits_do_not_leak() {
        let (mut host, a, _) = setup();
        let mut shared = asset();
        apply_overrides(&mut host, a, &shared, selection(0, 0), &PrototypeSettings::default());

        shared.colors[0] = [0.0, 0.0, 0.0, 1.0];
        shared.textures[0] = TextureHandle::new("stone");

        let block = &host.graph().get(a).unwrap().renderer().unwrap().overrides;
        assert_eq!(block.color(BASE_COLOR_SLOT), Some([0.2, 0.4, 0.6, 1.0]));
        assert_eq!(block.texture(BASE_TEXTURE_SLOT).unwrap().as_str(), "bricks");
    }

    #[test]
    fn test_custom_slot_names() {
        let (mut host, a, _) = setup();
        let settings = PrototypeSettings {
            texture_slot: "_MainTex".to_string(),
            color_slot: "_Tint".to_string(),
            ..Default::default()
        };
        apply_overrides(&mut host, a, &asset(), selection(0, 0), &settings);

        let block = &host.graph().get(a).unwrap().renderer().unwrap().overrides;
        assert!(block.texture("_MainTex").is_some());
        assert!(block.color("_Tint").is_some());
        assert!(block.texture(BASE_TEXTURE_SLOT).is_none());
    }

    #[test]
    fn test_no_renderer_returns_none() {
        let mut host = SceneHost::new();
        let marker = crate::asset::ShapeHandle::new("marker");
        host.templates_mut().register(marker.clone(), crate::scene::Template::empty());
        let id = host.instantiate(&marker).unwrap();

        assert!(apply_overrides(&mut host, id, &asset(), selection(0, 0), &PrototypeSettings::default()).is_none());
    }
}
