use super::helpers;

pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Offscreen color targets for the bloom chain.
///
/// - `hdr_*` hold the main scene color in Rgba16Float for post-processing.
/// - `bloom_*` are half-res buffers used for bright-pass and blur.
pub(crate) struct PostTargets {
    pub(crate) hdr_view: wgpu::TextureView,
    pub(crate) bloom_a_view: wgpu::TextureView,
    pub(crate) bloom_b_view: wgpu::TextureView,
}

impl PostTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        let (_, hdr_view) =
            helpers::create_texture(device, "hdr_tex", width, height, HDR_FORMAT, 1, usage);
        let bw = (width.max(1) / 2).max(1);
        let bh = (height.max(1) / 2).max(1);
        let (_, bloom_a_view) =
            helpers::create_texture(device, "bloom_a", bw, bh, HDR_FORMAT, 1, usage);
        let (_, bloom_b_view) =
            helpers::create_texture(device, "bloom_b", bw, bh, HDR_FORMAT, 1, usage);
        Self {
            hdr_view,
            bloom_a_view,
            bloom_b_view,
        }
    }
}

/// Size-dependent attachments of the scene pass.
pub(crate) struct RenderTargets {
    pub(crate) depth_view: wgpu::TextureView,
    /// Multisampled color, resolved into the HDR target or the swapchain.
    pub(crate) msaa_view: Option<wgpu::TextureView>,
    pub(crate) post: Option<PostTargets>,
    scene_format: wgpu::TextureFormat,
    sample_count: u32,
}

impl RenderTargets {
    pub(crate) fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        scene_format: wgpu::TextureFormat,
        sample_count: u32,
        post_processing: bool,
    ) -> Self {
        let mut targets = Self {
            depth_view: depth_view(device, width, height, sample_count),
            msaa_view: None,
            post: None,
            scene_format,
            sample_count,
        };
        targets.recreate(device, width, height, post_processing);
        targets
    }

    pub(crate) fn recreate(
        &mut self,
        device: &wgpu::Device,
        width: u32,
        height: u32,
        post_processing: bool,
    ) {
        self.depth_view = depth_view(device, width, height, self.sample_count);
        self.msaa_view = (self.sample_count > 1).then(|| {
            helpers::create_texture(
                device,
                "msaa_color",
                width,
                height,
                self.scene_format,
                self.sample_count,
                wgpu::TextureUsages::RENDER_ATTACHMENT,
            )
            .1
        });
        self.post = post_processing.then(|| PostTargets::new(device, width, height));
    }
}

fn depth_view(device: &wgpu::Device, width: u32, height: u32, sample_count: u32) -> wgpu::TextureView {
    helpers::create_texture(
        device,
        "depth",
        width,
        height,
        helpers::DEPTH_FORMAT,
        sample_count,
        wgpu::TextureUsages::RENDER_ATTACHMENT,
    )
    .1
}
