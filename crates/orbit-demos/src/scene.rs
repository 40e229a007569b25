//! Hardcoded scene: a reference triangle, a star at the origin and a planet
//! orbiting it.

use orbit_engine::render::{Abgr, PosColorVertex};

/// Reference triangle (red top, green bottom-left, blue bottom-right).
pub const TRIANGLE: [PosColorVertex; 3] = [
    PosColorVertex::new(0.0, 0.5, 0.0, 0xff00_00ff),
    PosColorVertex::new(-0.5, -0.5, 0.0, 0xff00_ff00),
    PosColorVertex::new(0.5, -0.5, 0.0, 0xffff_0000),
];

/// Star at the origin (cyan).
pub const STAR: PosColorVertex = PosColorVertex::new(0.0, 0.0, 0.0, 0xffff_ff00);

/// Planet color (yellow).
pub const ORBIT_COLOR: u32 = 0xff00_ffff;

pub const ORBIT_RADIUS: f32 = 0.5;
pub const ORBIT_SEED_RADIUS: f32 = 0.3;
/// Radians per frame.
pub const ANGULAR_STEP: f32 = 0.02;

/// Which primitives a program draws and how the planet moves.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub title: String,
    pub triangle: bool,
    pub star: bool,
    pub orbit: bool,
    /// Planet position before the first frame updates it.
    pub orbit_seed_radius: f32,
    pub orbit_radius: f32,
    pub angular_step: f32,
    pub clear_color: Abgr,
}

impl SceneConfig {
    /// Triangle only.
    pub fn triangle() -> Self {
        Self {
            title: "orbit: triangle".to_string(),
            star: false,
            orbit: false,
            ..Self::default()
        }
    }

    /// Star and orbiting planet.
    pub fn orbit() -> Self {
        Self {
            title: "orbit: star".to_string(),
            triangle: false,
            ..Self::default()
        }
    }

    /// Everything.
    pub fn solar() -> Self {
        Self::default()
    }

    /// Seed vertex of the dynamic planet buffer.
    pub fn orbit_seed(&self) -> PosColorVertex {
        PosColorVertex::new(self.orbit_seed_radius, 0.0, 0.0, ORBIT_COLOR)
    }

    /// Planet vertex at `frame`.
    pub fn orbit_vertex(&self, frame: u32) -> PosColorVertex {
        let [x, y, z] = orbit_position(frame, self.orbit_radius, self.angular_step);
        PosColorVertex::new(x, y, z, ORBIT_COLOR)
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            title: "orbit: solar".to_string(),
            triangle: true,
            star: true,
            orbit: true,
            orbit_seed_radius: ORBIT_SEED_RADIUS,
            orbit_radius: ORBIT_RADIUS,
            angular_step: ANGULAR_STEP,
            // 0xff101020 read as 0xRRGGBBAA.
            clear_color: Abgr::from_rgba8(0xff, 0x10, 0x10, 0x20),
        }
    }
}

/// `(r·cos θ, r·sin θ, 0)` with `θ = frame · step`.
pub fn orbit_position(frame: u32, radius: f32, step: f32) -> [f32; 3] {
    let theta = frame as f32 * step;
    [radius * theta.cos(), radius * theta.sin(), 0.0]
}

/// Overlay line 1.
pub fn frame_line(frame: u32) -> String {
    format!("orbit frame {frame}")
}

/// Overlay line 2.
pub fn draw_calls_line(draw_calls: u32) -> String {
    format!("draw calls {draw_calls}")
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── orbit ──────────────────────────────────────────────────────────────

    #[test]
    fn frame_zero_is_on_the_x_axis() {
        assert_eq!(orbit_position(0, ORBIT_RADIUS, ANGULAR_STEP), [0.5, 0.0, 0.0]);
    }

    #[test]
    fn position_follows_the_angular_step() {
        for frame in [1u32, 50, 157, 1000] {
            let [x, y, z] = orbit_position(frame, 0.5, 0.02);
            let theta = frame as f32 * 0.02;
            assert!((x - 0.5 * theta.cos()).abs() < 1e-6);
            assert!((y - 0.5 * theta.sin()).abs() < 1e-6);
            assert_eq!(z, 0.0);
        }
    }

    #[test]
    fn position_stays_on_the_circle() {
        for frame in (0..400).step_by(7) {
            let [x, y, _] = orbit_position(frame, 0.5, 0.02);
            assert!(((x * x + y * y).sqrt() - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn seed_uses_seed_radius() {
        let seed = SceneConfig::solar().orbit_seed();
        assert_eq!(seed.position, [0.3, 0.0, 0.0]);
        assert_eq!(seed.color, Abgr(ORBIT_COLOR));
    }

    #[test]
    fn animated_vertex_uses_orbit_radius() {
        let v = SceneConfig::solar().orbit_vertex(0);
        assert_eq!(v.position, [0.5, 0.0, 0.0]);
    }

    // ── variants ───────────────────────────────────────────────────────────

    #[test]
    fn variants_select_primitives() {
        let t = SceneConfig::triangle();
        assert!(t.triangle && !t.star && !t.orbit);
        let o = SceneConfig::orbit();
        assert!(!o.triangle && o.star && o.orbit);
        let s = SceneConfig::solar();
        assert!(s.triangle && s.star && s.orbit);
    }

    #[test]
    fn clear_color_reads_packed_value_as_rgba() {
        let expected = 0xff10_1020u32.to_be_bytes();
        assert_eq!(SceneConfig::default().clear_color.to_rgba8(), expected);
        assert_eq!(SceneConfig::triangle().clear_color, SceneConfig::solar().clear_color);
    }

    #[test]
    fn triangle_corners_are_red_green_blue() {
        assert_eq!(TRIANGLE[0].color.to_rgba8(), [0xff, 0, 0, 0xff]);
        assert_eq!(TRIANGLE[1].color.to_rgba8(), [0, 0xff, 0, 0xff]);
        assert_eq!(TRIANGLE[2].color.to_rgba8(), [0, 0, 0xff, 0xff]);
    }

    // ── overlay ────────────────────────────────────────────────────────────

    #[test]
    fn overlay_lines() {
        assert_eq!(frame_line(42), "orbit frame 42");
        assert_eq!(draw_calls_line(3), "draw calls 3");
    }
}
