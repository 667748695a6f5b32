use crate::viewer::settings::{ContentSource, ViewerSettings};
use crate::viewer::state::{ContentPhase, FramingState, LocalBounds};
use crate::viewer::{FALLBACK_SPHERE_DIAMETER, FALLBACK_SPHERE_POSITION, MAX_SPAWN_WAIT_FRAMES};
use bevy::asset::RecursiveDependencyLoadState;
use bevy::camera::primitives::Aabb;
use bevy::prelude::*;
use tracing::{debug, info, warn};

/// Root of whatever is being framed.
#[derive(Component)]
pub struct FramedContent;

#[derive(Component)]
pub struct FallbackPlaceholder;

pub fn spawn_content(
    mut commands: Commands,
    settings: Res<ViewerSettings>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut state: ResMut<FramingState>,
) {
    let root = match &settings.content {
        ContentSource::Showcase {
            width,
            height,
            depth,
        } => {
            // Pivot at the lower-left front corner, like generated glyph meshes.
            let mesh = Mesh::from(Cuboid::new(*width, *height, *depth)).translated_by(Vec3::new(
                width * 0.5,
                height * 0.5,
                0.0,
            ));
            let material = materials.add(StandardMaterial {
                base_color: Color::WHITE,
                emissive: LinearRgba::rgb(0.08, 0.08, 0.08),
                reflectance: 0.2,
                perceptual_roughness: 0.7,
                ..default()
            });

            commands
                .spawn((
                    Mesh3d(meshes.add(mesh)),
                    MeshMaterial3d(material),
                    Transform::default(),
                    FramedContent,
                ))
                .id()
        }
        ContentSource::Model { path } => {
            let scene: Handle<Scene> = asset_server.load(format!("{path}#Scene0"));
            state.scene = Some(scene.clone());
            commands
                .spawn((SceneRoot(scene), Transform::default(), FramedContent))
                .id()
        }
    };

    info!("Spawned {}", settings.content.label());
    state.root = Some(root);
    state.phase = ContentPhase::Pending { frames_waited: 0 };
    state.status = format!("Loading {}", settings.content.label());
}

/// Waits for the content to finish loading, then records its bounds once.
///
/// Bounds are taken in the root's local space so later rescaling of the root
/// does not feed back into them.
pub fn measure_content(
    mut state: ResMut<FramingState>,
    asset_server: Res<AssetServer>,
    children: Query<&Children>,
    bounded: Query<(&Aabb, &GlobalTransform)>,
    globals: Query<&GlobalTransform>,
) {
    let ContentPhase::Pending { frames_waited } = state.phase else {
        return;
    };
    let Some(root) = state.root else {
        return;
    };

    // Meshes and materials are dependencies of the scene; bounds taken before
    // they arrive would be empty or partial.
    let load_state = state
        .scene
        .as_ref()
        .map(|scene| asset_server.recursive_dependency_load_state(scene));
    match Readiness::of(load_state) {
        Readiness::Ready => {}
        Readiness::Waiting => return,
        Readiness::Failed(err) => {
            warn!("Content failed to load: {err}");
            mark_missing(&mut state, format!("Load failed: {err}"));
            return;
        }
    }

    let Ok(root_global) = globals.get(root) else {
        return;
    };

    let bounds = hierarchy_bounds(root, root_global, &children, &bounded);
    if bounds.is_empty() {
        if frames_waited >= MAX_SPAWN_WAIT_FRAMES {
            warn!("Content produced no measurable geometry after {frames_waited} frames");
            mark_missing(&mut state, "Content has no geometry".to_string());
        } else {
            state.phase = ContentPhase::Pending {
                frames_waited: frames_waited + 1,
            };
        }
        return;
    }

    debug!("Measured content bounds {:?}..{:?}", bounds.min, bounds.max);
    state.phase = ContentPhase::Measured(bounds);
    state.needs_fit = true;
    state.status = "Content ready".to_string();
}

#[derive(Debug, PartialEq)]
enum Readiness {
    Waiting,
    Ready,
    Failed(String),
}

impl Readiness {
    /// `None` means generated content with nothing to load.
    fn of(load_state: Option<RecursiveDependencyLoadState>) -> Self {
        match load_state {
            None | Some(RecursiveDependencyLoadState::Loaded) => Self::Ready,
            Some(RecursiveDependencyLoadState::Failed(err)) => Self::Failed(err.to_string()),
            Some(_) => Self::Waiting,
        }
    }
}

fn mark_missing(state: &mut FramingState, status: String) {
    state.phase = ContentPhase::Missing;
    state.needs_fit = true;
    state.status = status;
}

fn hierarchy_bounds(
    root: Entity,
    root_global: &GlobalTransform,
    children: &Query<&Children>,
    bounded: &Query<(&Aabb, &GlobalTransform)>,
) -> LocalBounds {
    let to_root = root_global.affine().inverse();
    let mut bounds = LocalBounds::default();

    for entity in std::iter::once(root).chain(children.iter_descendants(root)) {
        if let Ok((aabb, global)) = bounded.get(entity) {
            bounds.include_box(
                Vec3::from(aabb.min()),
                Vec3::from(aabb.max()),
                &(to_root * global.affine()),
            );
        }
    }

    bounds
}

/// Placeholder shown when there is nothing to frame. Spawned at most once.
pub fn spawn_fallback_placeholder(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    state: &mut FramingState,
) {
    if state.fallback.is_some() {
        debug!("Fallback placeholder already present");
        return;
    }

    let entity = commands
        .spawn((
            Mesh3d(meshes.add(Sphere::new(FALLBACK_SPHERE_DIAMETER * 0.5))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.8, 0.8, 0.8),
                perceptual_roughness: 0.6,
                ..default()
            })),
            Transform::from_translation(FALLBACK_SPHERE_POSITION),
            FallbackPlaceholder,
        ))
        .id();
    state.fallback = Some(entity);
    info!("Spawned fallback placeholder");
}
