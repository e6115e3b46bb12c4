//! Demo driver: loads a model given on the command line, spins a few
//! hundred frames of the full pipeline (context, input, physics, audio,
//! scene, debug lines) over the headless backend and reports the device
//! counters.
//!
//! Usage: `meteor3d_demo <model.obj>` with the model under
//! `resources/models/`.

use std::sync::{Arc, Mutex};

use glam::{Vec3, Vec4};

use meteor_3d_engine::audio::AudioScene;
use meteor_3d_engine::context::{Context, WindowConfig};
use meteor_3d_engine::engine_info;
use meteor_3d_engine::error::{Error, Result};
use meteor_3d_engine::graphics_device::GraphicsDevice;
use meteor_3d_engine::input::{Input, Key, KeyState};
use meteor_3d_engine::physics::{PhysicsScene, PhysicsSettings};
use meteor_3d_engine::resource::{MaterialSet, ModelSet, TextResource};
use meteor_3d_engine::scene::{
    begin_frame, Camera, DebugRenderer, Projection, Scene, Transform, TransformStore,
};
use meteor_3d_engine::{App, Engine};
use meteor_3d_engine_backend_headless::{
    HeadlessAudioBackend, HeadlessGraphicsDevice, HeadlessWindowBackend,
};

const WINDOW_SIZE: (u32, u32) = (1080, 720);
const DEMO_FRAME_COUNT: u32 = 300;

struct DemoApp {
    model_file: String,
    frames: u32,
    device: Option<Arc<Mutex<dyn GraphicsDevice>>>,
    context: Option<Context>,
    input: Input,
    transforms: TransformStore,
    scene: Option<Scene>,
    debug: Option<DebugRenderer>,
    physics: Option<PhysicsScene>,
    audio: Option<AudioScene>,
}

impl DemoApp {
    fn new(model_file: String) -> Self {
        Self {
            model_file,
            frames: 0,
            device: None,
            context: None,
            input: Input::new(),
            transforms: TransformStore::new(),
            scene: None,
            debug: None,
            physics: None,
            audio: None,
        }
    }
}

impl App for DemoApp {
    fn setup(&mut self) -> Result<()> {
        let (window, _events) = HeadlessWindowBackend::new();
        let mut context = Context::initialize(Box::new(window))?;
        context.configure(
            WindowConfig {
                title: "Meteor3D Demo".to_string(),
                size: WINDOW_SIZE,
                vsync: false,
                fullscreen: false,
            },
            None,
        );

        let device: Arc<Mutex<dyn GraphicsDevice>> =
            Arc::new(Mutex::new(HeadlessGraphicsDevice::new()));

        let vertex_shader = TextResource::create("shaders/vertex.glsl")?;
        let fragment_shader = TextResource::create("shaders/fragment.glsl")?;

        let mut scene = Scene::new(
            "demo scene",
            Arc::clone(&device),
            vertex_shader.data(),
            fragment_shader.data(),
        )?;

        let debug_vertex = TextResource::create("shaders/debug_vertex.glsl")?;
        let debug_fragment = TextResource::create("shaders/debug_fragment.glsl")?;
        let debug = DebugRenderer::new(
            Arc::clone(&device),
            debug_vertex.data(),
            debug_fragment.data(),
            256,
        )?;

        // Materials live next to the model, same stem
        let material_file = self.model_file.replace(".obj", ".mtl");
        let materials = match TextResource::create(&format!("models/{}", material_file)) {
            Ok(resource) => MaterialSet::parse(resource.data())?,
            Err(Error::FileOpen { .. }) => MaterialSet::parse("")?,
            Err(error) => return Err(error),
        };

        let model_text = TextResource::create(&format!("models/{}", self.model_file))?;
        let models = ModelSet::parse(model_text.data(), &materials, &Transform::IDENTITY)?;

        let model = models
            .models()
            .first()
            .cloned()
            .ok_or_else(|| Error::UnknownModel(self.model_file.clone()))?;

        engine_info!(
            "meteor3d::Demo",
            "Loaded '{}' with {} vertices",
            model.name,
            model.vertices.len()
        );

        // The subject falls onto a static floor
        let subject = self.transforms.insert(Transform::from_position(Vec3::new(0.0, 4.0, 0.0)));
        let floor = self.transforms.insert(Transform::from_position(Vec3::new(0.0, -1.0, 0.0)));

        let batch = scene.create_batch(model);
        scene.create_component(batch, subject)?;

        let camera_entity = self.transforms.insert(Transform {
            position: Vec3::new(0.0, 1.0, 8.0),
            rotation: Vec3::new(0.0, -90.0, 0.0),
            scale: Vec3::ONE,
        });
        let mut camera = Camera::new(camera_entity);
        camera.configure(Projection::Perspective { fov_degrees: 90.0 }, 0.1, 1000.0);
        scene.set_main_camera(camera);

        let mut physics = PhysicsScene::new(PhysicsSettings {
            drag: 0.01,
            gravity: -9.81,
            elasticity: 0.4,
        });
        physics.create_component(subject, Vec3::splat(0.5), 1.0, false);
        physics.create_component(floor, Vec3::new(20.0, 0.5, 20.0), 1.0, true);

        let (audio_backend, _audio_state) = HeadlessAudioBackend::new();
        let mut audio = AudioScene::new(Box::new(audio_backend));
        audio.configure_listener(camera_entity);

        self.device = Some(device);
        self.context = Some(context);
        self.scene = Some(scene);
        self.debug = Some(debug);
        self.physics = Some(physics);
        self.audio = Some(audio);

        Ok(())
    }

    fn frame(&mut self, dt: f32) -> Result<()> {
        let context = self.context.as_mut().unwrap();
        let scene = self.scene.as_mut().unwrap();
        let debug = self.debug.as_mut().unwrap();
        let physics = self.physics.as_mut().unwrap();
        let audio = self.audio.as_mut().unwrap();
        let device = self.device.as_ref().unwrap();

        // Fixed frame order: poll, sample, simulate, listen, rebuild, draw
        context.update(&mut self.input);
        self.input.update();

        if self.input.key(Key::Escape, KeyState::DOWN) {
            Engine::request_exit();
        }

        physics.update(dt, &mut self.transforms);
        physics.resolve_collisions(&mut self.transforms);

        audio.update(&self.transforms);

        let framebuffer = context.framebuffer_size();
        scene.update(&self.transforms, framebuffer)?;

        begin_frame(device, framebuffer);
        scene.render()?;

        debug.draw_box_lines(Vec3::new(0.0, -1.0, 0.0), Vec3::new(40.0, 1.0, 40.0), Vec4::ONE);
        if let Some(camera) = scene.main_camera() {
            let projection = *camera.projection_matrix();
            let view = *camera.view_matrix();
            debug.finish_rendering(&projection, &view)?;
        }

        context.swap_buffers();

        self.frames += 1;
        if self.frames >= DEMO_FRAME_COUNT {
            Engine::request_exit();
        }

        Ok(())
    }

    fn shutdown(&mut self) {
        if let Some(device) = self.device.as_ref() {
            let stats = device.lock().unwrap().stats();
            engine_info!(
                "meteor3d::Demo",
                "Rendered {} frames: {} draw calls, {} triangles",
                self.frames,
                stats.draw_calls,
                stats.triangles
            );
        }
    }
}

fn main() {
    let mut args = std::env::args().skip(1);

    let Some(model_file) = args.next() else {
        eprintln!("usage: meteor3d_demo <model.obj>");
        std::process::exit(1);
    };

    let mut app = DemoApp::new(model_file);

    if let Err(error) = Engine::run(&mut app) {
        eprintln!("{}", error);
        std::process::exit(1);
    }
}
