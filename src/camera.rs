use cosmos_core::constants::{
    camera_position_vec3, AMBIENT_INTENSITY, KEY_LIGHT_INTENSITY, KEY_LIGHT_POSITION,
    RIM_LIGHT_INTENSITY, RIM_LIGHT_POSITION, RIM_LIGHT_RGB,
};
use cosmos_core::Camera;

/// Per-frame globals shared by the mesh and point pipelines (group 0).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_right: [f32; 4],
    pub camera_up: [f32; 4],
    /// xyz eye, w elapsed seconds.
    pub eye_time: [f32; 4],
    /// width, height, tan(fovy / 2), unused.
    pub viewport: [f32; 4],
    /// xyz position, w intensity.
    pub key_light: [f32; 4],
    /// xyz position, w intensity (0 when the tier has no rim light).
    pub rim_light: [f32; 4],
    /// rgb rim color, w ambient intensity.
    pub rim_color_ambient: [f32; 4],
}

impl CameraUniform {
    pub fn new(width: u32, height: u32, time: f32, rim_light: bool) -> Self {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        let camera = Camera::scene(aspect);
        let view = camera.view_matrix();
        // Rows of the view rotation are the camera axes in world space
        let right = view.row(0).truncate();
        let up = view.row(1).truncate();
        let eye = camera_position_vec3();
        let rim_intensity = if rim_light { RIM_LIGHT_INTENSITY } else { 0.0 };
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_right: right.extend(0.0).to_array(),
            camera_up: up.extend(0.0).to_array(),
            eye_time: eye.extend(time).to_array(),
            viewport: [
                width as f32,
                height as f32,
                (camera.fovy_radians * 0.5).tan(),
                0.0,
            ],
            key_light: [
                KEY_LIGHT_POSITION[0],
                KEY_LIGHT_POSITION[1],
                KEY_LIGHT_POSITION[2],
                KEY_LIGHT_INTENSITY,
            ],
            rim_light: [
                RIM_LIGHT_POSITION[0],
                RIM_LIGHT_POSITION[1],
                RIM_LIGHT_POSITION[2],
                rim_intensity,
            ],
            rim_color_ambient: [
                RIM_LIGHT_RGB[0],
                RIM_LIGHT_RGB[1],
                RIM_LIGHT_RGB[2],
                AMBIENT_INTENSITY,
            ],
        }
    }
}
