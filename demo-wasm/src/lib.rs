use clothy::{ClothConfig, ClothSimulation, Command, Float, StepObserver, UserParameters, Vec3};
use wasm_bindgen::prelude::*;

/// Flat `[x0, y0, z0, x1, ...]` copies of the last settled frame.
#[derive(Default)]
struct FrameBuffers {
    positions: Vec<f32>,
    normals: Vec<f32>,
}

fn flatten<F: Float>(src: &[Vec3<F>], out: &mut Vec<f32>) {
    out.clear();
    out.reserve(src.len() * 3);
    for v in src {
        out.push(v.x.to_f32());
        out.push(v.y.to_f32());
        out.push(v.z.to_f32());
    }
}

impl StepObserver<f32> for FrameBuffers {
    fn on_frame(&mut self, positions: &[Vec3<f32>], normals: &[Vec3<f32>]) {
        flatten(positions, &mut self.positions);
        flatten(normals, &mut self.normals);
    }
}

fn js_error(e: clothy::ClothError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// ---- Cloth Demo ----

#[wasm_bindgen]
pub struct ClothDemo {
    cloth: ClothSimulation<f32>,
    frame: FrameBuffers,
}

#[wasm_bindgen]
impl ClothDemo {
    #[wasm_bindgen(constructor)]
    pub fn new(resolution: usize) -> Result<ClothDemo, JsValue> {
        let cloth = ClothSimulation::new(ClothConfig::new().with_resolution(resolution)).map_err(js_error)?;
        let mut frame = FrameBuffers::default();
        frame.on_frame(cloth.positions(), cloth.normals());
        Ok(ClothDemo { cloth, frame })
    }

    /// Live slider values: stiffness, total mass, damping, wind.
    pub fn set_parameters(&mut self, k: f32, m: f32, mu: f32, wind: f32) -> Result<(), JsValue> {
        let parameters = UserParameters { stiffness: k, mass: m, damping: mu, wind };
        self.cloth.set_parameters(parameters).map_err(js_error)
    }

    pub fn start(&mut self) {
        self.cloth.apply(Command::Start);
    }

    pub fn stop(&mut self) {
        self.cloth.apply(Command::Stop);
    }

    pub fn restart(&mut self) {
        self.cloth.apply(Command::Restart);
        self.frame.on_frame(self.cloth.positions(), self.cloth.normals());
    }

    pub fn force_continue(&mut self) {
        self.cloth.force_continue();
    }

    /// Advance one displayed frame. Returns true if the cloth is diverged.
    pub fn update(&mut self, elapsed: f32, time_scale: f32) -> bool {
        self.cloth.step(elapsed, time_scale, &mut self.frame).diverged
    }

    /// Returns flat [x0, y0, z0, x1, ...] in row-major order
    pub fn positions(&self) -> Vec<f32> {
        self.frame.positions.clone()
    }

    /// Returns flat per-vertex normals, same layout as `positions`
    pub fn normals(&self) -> Vec<f32> {
        self.frame.normals.clone()
    }

    pub fn diverged(&self) -> bool {
        self.cloth.diverged()
    }

    pub fn particle_count(&self) -> usize {
        self.cloth.particle_count()
    }
    pub fn resolution(&self) -> usize {
        self.cloth.topology().resolution()
    }

    /// Returns [cx, cy, cz, radius]
    pub fn sphere(&self) -> Vec<f32> {
        let sphere = self.cloth.shapes().sphere;
        vec![sphere.center.x, sphere.center.y, sphere.center.z, sphere.radius]
    }

    pub fn ground_height(&self) -> f32 {
        self.cloth.shapes().ground.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_buffers_follow_steps() {
        let mut demo = ClothDemo::new(6).unwrap();
        assert_eq!(demo.positions().len(), 36 * 3);
        assert_eq!(demo.normals().len(), 36 * 3);
        let before = demo.positions();
        assert!(!demo.update(1.0 / 60.0, 1.0));
        assert_ne!(demo.positions(), before);
    }

    #[test]
    fn stop_freezes_buffers() {
        let mut demo = ClothDemo::new(6).unwrap();
        demo.stop();
        let before = demo.positions();
        demo.update(1.0 / 60.0, 1.0);
        assert_eq!(demo.positions(), before);
        demo.restart();
        assert_eq!(demo.resolution(), 6);
    }
}
