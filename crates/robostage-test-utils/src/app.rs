//! Bevy test app builders with various plugin combinations.

use bevy::prelude::*;

/// App with only the core plugin: [`StageConfig`](robostage_core::StageConfig)
/// is available, nothing else runs.
pub fn minimal_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(robostage_core::RoboStageCorePlugin);
    app.finish();
    app.cleanup();
    app
}

/// Core plus scene plugins, so edited local poses propagate on update.
pub fn scene_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(robostage_core::RoboStageCorePlugin);
    app.add_plugins(robostage_scene::RoboStageScenePlugin);
    app.finish();
    app.cleanup();
    app
}

/// Core, scene and animation plugins.
pub fn full_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(robostage_core::RoboStageCorePlugin);
    app.add_plugins(robostage_scene::RoboStageScenePlugin);
    app.add_plugins(robostage_anim::RoboStageAnimPlugin);
    app.finish();
    app.cleanup();
    app
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_app_builds() {
        let app = minimal_test_app();
        assert!(
            app.world()
                .get_resource::<robostage_core::StageConfig>()
                .is_some()
        );
    }

    #[test]
    fn full_app_can_update() {
        let mut app = full_test_app();
        assert!(
            app.world()
                .get_resource::<robostage_anim::AnimationClock>()
                .is_some()
        );
        app.update();
        app.update();
    }
}
