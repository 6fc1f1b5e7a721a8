//! Unit tests for registry.rs
//!
//! Slot assignment, draw targets and ordered walks over the registry,
//! driven through MockGraphicsDevice.

use crate::error::Error;
use crate::graphics_device::mock_graphics_device::{DeviceCommand, MockGraphicsDevice};
use crate::graphics_device::{
    AttachmentSlot, FramebufferHandle, GraphicsDevice, ImageFilter, ImageWrap, PixelFormat,
    SamplerState,
};
use crate::framebuffer::{AttachmentRegistry, PendingRelease, ReleaseQueue};

const RGB32F: PixelFormat = PixelFormat::R32G32B32_SFLOAT;
const DEPTH: PixelFormat = PixelFormat::D32_SFLOAT;

fn setup() -> (MockGraphicsDevice, FramebufferHandle, AttachmentRegistry) {
    let mut device = MockGraphicsDevice::new(800, 600);
    let fb = device.create_framebuffer(800, 600).unwrap();
    (device, fb, AttachmentRegistry::new(ReleaseQueue::new(), SamplerState::default()))
}

fn attach(
    registry: &mut AttachmentRegistry,
    device: &mut MockGraphicsDevice,
    fb: FramebufferHandle,
    name: &str,
    format: PixelFormat,
) -> crate::error::Result<AttachmentSlot> {
    registry.attach(device, fb, 800, 600, name, format)
}

// ============================================================================
// SLOT ASSIGNMENT
// ============================================================================

#[test]
fn test_color_slots_follow_creation_order() {
    let (mut device, fb, mut registry) = setup();

    assert_eq!(attach(&mut registry, &mut device, fb, "diffuse", RGB32F).unwrap(), AttachmentSlot::color(0));
    assert_eq!(attach(&mut registry, &mut device, fb, "position", RGB32F).unwrap(), AttachmentSlot::color(1));

    registry.release_all(&mut device);
}

#[test]
fn test_reversed_creation_reverses_slots() {
    let (mut device, fb, mut registry) = setup();

    attach(&mut registry, &mut device, fb, "position", RGB32F).unwrap();
    attach(&mut registry, &mut device, fb, "diffuse", RGB32F).unwrap();

    assert_eq!(registry.slot_of("position").unwrap(), AttachmentSlot::color(0));
    assert_eq!(registry.slot_of("diffuse").unwrap(), AttachmentSlot::color(1));

    registry.release_all(&mut device);
}

#[test]
fn test_depth_does_not_consume_a_color_slot() {
    let (mut device, fb, mut registry) = setup();

    assert_eq!(attach(&mut registry, &mut device, fb, "depth", DEPTH).unwrap(), AttachmentSlot::Depth);
    assert_eq!(attach(&mut registry, &mut device, fb, "diffuse", RGB32F).unwrap(), AttachmentSlot::color(0));
    attach(&mut registry, &mut device, fb, "normal", PixelFormat::R16G16B16A16_SFLOAT).unwrap();

    assert_eq!(registry.color_attachment_count(), 2);
    assert_eq!(registry.len(), 3);
    assert_eq!(registry.depth_attachment(), Some("depth"));

    let fbo = device.framebuffer(fb).unwrap();
    assert_eq!(fbo.attachments.len(), 3);
    assert_eq!(fbo.attachments.get(&AttachmentSlot::Depth), Some(&registry.get("depth").unwrap().image()));

    registry.release_all(&mut device);
}

#[test]
fn test_attachment_records_format() {
    let (mut device, fb, mut registry) = setup();
    attach(&mut registry, &mut device, fb, "normal", PixelFormat::R16G16B16A16_UINT).unwrap();

    let normal = registry.get("normal").unwrap();
    assert_eq!(normal.name(), "normal");
    assert_eq!(normal.pixel_format(), PixelFormat::R16G16B16A16_UINT);
    assert_eq!(normal.channel_layout(), crate::graphics_device::ChannelLayout::Rgba);
    assert_eq!(normal.storage_datatype(), crate::graphics_device::StorageDatatype::UnsignedShort);
    assert!(!normal.is_depth());

    let info = device.image_info(normal.image()).unwrap();
    assert_eq!((info.width, info.height), (800, 600));

    registry.release_all(&mut device);
}

// ============================================================================
// ATTACH ERRORS
// ============================================================================

#[test]
fn test_second_depth_is_rejected() {
    let (mut device, fb, mut registry) = setup();
    attach(&mut registry, &mut device, fb, "depth", DEPTH).unwrap();

    let result = attach(&mut registry, &mut device, fb, "depth2", DEPTH);
    assert_eq!(result, Err(Error::DuplicateDepthAttachment("depth".to_string())));
    assert_eq!(registry.len(), 1);
    assert_eq!(device.live_image_count(), 1);

    registry.release_all(&mut device);
}

#[test]
fn test_unsupported_format_allocates_nothing() {
    let (mut device, fb, mut registry) = setup();

    let result = attach(&mut registry, &mut device, fb, "albedo", PixelFormat::R8G8B8A8_UNORM);
    assert_eq!(result, Err(Error::UnsupportedFormat(PixelFormat::R8G8B8A8_UNORM)));
    assert_eq!(device.live_image_count(), 0);
    assert!(registry.is_empty());
    assert_eq!(registry.color_attachment_count(), 0);
}

#[test]
fn test_duplicate_and_empty_names() {
    let (mut device, fb, mut registry) = setup();
    attach(&mut registry, &mut device, fb, "diffuse", RGB32F).unwrap();

    let duplicate = attach(&mut registry, &mut device, fb, "diffuse", PixelFormat::R32G32B32A32_SFLOAT);
    assert_eq!(duplicate, Err(Error::DuplicateAttachment("diffuse".to_string())));
    assert_eq!(registry.get("diffuse").unwrap().pixel_format(), RGB32F);

    let empty = attach(&mut registry, &mut device, fb, "", RGB32F);
    assert!(matches!(empty, Err(Error::InvalidState(_))));

    assert_eq!(registry.len(), 1);
    assert_eq!(device.live_image_count(), 1);

    registry.release_all(&mut device);
}

#[test]
fn test_allocation_failure_leaves_registry_unchanged() {
    let (mut device, fb, mut registry) = setup();
    device.fail_image_allocations_after(1);

    attach(&mut registry, &mut device, fb, "diffuse", RGB32F).unwrap();
    let result = attach(&mut registry, &mut device, fb, "position", RGB32F);

    assert!(matches!(result, Err(Error::ResourceAllocation(_))));
    assert_eq!(registry.names(), ["diffuse".to_string()]);
    assert_eq!(registry.color_attachment_count(), 1);
    assert!(registry.get("position").is_none());

    registry.release_all(&mut device);
}

#[test]
fn test_attach_failure_releases_the_new_image() {
    let (mut device, fb, mut registry) = setup();
    device.destroy_framebuffer(fb);

    let result = attach(&mut registry, &mut device, fb, "diffuse", RGB32F);
    assert!(matches!(result, Err(Error::BackendError(_))));
    assert_eq!(device.live_image_count(), 0);
    assert!(registry.is_empty());
}

// ============================================================================
// DRAW TARGETS
// ============================================================================

#[test]
fn test_set_draw_targets() {
    let (mut device, fb, mut registry) = setup();
    attach(&mut registry, &mut device, fb, "depth", DEPTH).unwrap();
    attach(&mut registry, &mut device, fb, "diffuse", RGB32F).unwrap();
    attach(&mut registry, &mut device, fb, "position", RGB32F).unwrap();

    registry.set_draw_targets(&mut device, fb, &["position", "diffuse"]).unwrap();

    assert_eq!(registry.draw_targets(), [AttachmentSlot::color(1), AttachmentSlot::color(0)]);
    assert_eq!(registry.draw_target_names(), ["position".to_string(), "diffuse".to_string()]);
    assert_eq!(
        device.framebuffer(fb).unwrap().draw_buffers,
        vec![AttachmentSlot::color(1), AttachmentSlot::color(0)]
    );

    registry.release_all(&mut device);
}

#[test]
fn test_empty_draw_target_list() {
    let (mut device, fb, mut registry) = setup();
    attach(&mut registry, &mut device, fb, "diffuse", RGB32F).unwrap();
    registry.set_draw_targets(&mut device, fb, &["diffuse"]).unwrap();

    let none: [&str; 0] = [];
    registry.set_draw_targets(&mut device, fb, &none).unwrap();
    assert!(registry.draw_targets().is_empty());

    registry.release_all(&mut device);
}

#[test]
fn test_invalid_draw_targets_keep_previous_configuration() {
    let (mut device, fb, mut registry) = setup();
    attach(&mut registry, &mut device, fb, "depth", DEPTH).unwrap();
    attach(&mut registry, &mut device, fb, "diffuse", RGB32F).unwrap();
    attach(&mut registry, &mut device, fb, "position", RGB32F).unwrap();
    registry.set_draw_targets(&mut device, fb, &["diffuse"]).unwrap();
    device.clear_commands();

    let unknown = registry.set_draw_targets(&mut device, fb, &["position", "unknown"]);
    assert_eq!(unknown, Err(Error::UnknownAttachment("unknown".to_string())));

    let depth = registry.set_draw_targets(&mut device, fb, &["depth"]);
    assert!(matches!(depth, Err(Error::InvalidState(_))));

    let twice = registry.set_draw_targets(&mut device, fb, &["diffuse", "diffuse"]);
    assert!(matches!(twice, Err(Error::InvalidState(_))));

    assert_eq!(registry.draw_targets(), [AttachmentSlot::color(0)]);
    assert_eq!(device.framebuffer(fb).unwrap().draw_buffers, vec![AttachmentSlot::color(0)]);
    assert!(device.commands().is_empty());

    registry.release_all(&mut device);
}

// ============================================================================
// LOOKUP AND ORDERED WALKS
// ============================================================================

#[test]
fn test_unknown_lookups() {
    let (_device, _fb, registry) = setup();
    assert_eq!(registry.slot_of("missing"), Err(Error::UnknownAttachment("missing".to_string())));
    assert_eq!(registry.unit_index_of("missing"), Err(Error::UnknownAttachment("missing".to_string())));
    assert!(registry.get("missing").is_none());
}

#[test]
fn test_creation_order_survives_many_names() {
    let (mut device, fb, mut registry) = setup();
    let names: Vec<String> = (0..32).map(|i| format!("target_{:02}", 31 - i)).collect();
    for name in &names {
        attach(&mut registry, &mut device, fb, name, RGB32F).unwrap();
    }

    assert_eq!(registry.names(), names.as_slice());
    for (k, attachment) in registry.iter().enumerate() {
        assert_eq!(attachment.name(), names[k]);
        assert_eq!(attachment.slot(), AttachmentSlot::color(k as u32));
    }

    registry.release_all(&mut device);
}

#[test]
fn test_read_layout_places_depth_last() {
    let (mut device, fb, mut registry) = setup();
    attach(&mut registry, &mut device, fb, "depth", DEPTH).unwrap();
    attach(&mut registry, &mut device, fb, "diffuse", RGB32F).unwrap();
    attach(&mut registry, &mut device, fb, "position", RGB32F).unwrap();

    let layout: Vec<(u32, &str)> = registry
        .read_layout()
        .into_iter()
        .map(|(unit, attachment)| (unit, attachment.name()))
        .collect();
    assert_eq!(layout, vec![(0, "diffuse"), (1, "position"), (2, "depth")]);

    assert_eq!(registry.unit_index_of("depth").unwrap(), 2);
    assert_eq!(registry.unit_index_of("position").unwrap(), 1);

    registry.release_all(&mut device);
}

// ============================================================================
// TEARDOWN
// ============================================================================

#[test]
fn test_release_all_in_creation_order() {
    let (mut device, fb, mut registry) = setup();
    attach(&mut registry, &mut device, fb, "position", RGB32F).unwrap();
    attach(&mut registry, &mut device, fb, "depth", DEPTH).unwrap();
    attach(&mut registry, &mut device, fb, "diffuse", RGB32F).unwrap();
    let expected: Vec<_> = registry.iter().map(|a| a.image()).collect();
    device.clear_commands();

    registry.release_all(&mut device);

    let destroyed: Vec<_> = device
        .commands()
        .iter()
        .filter_map(|cmd| match cmd {
            DeviceCommand::DestroyImage(image) => Some(*image),
            _ => None,
        })
        .collect();
    assert_eq!(destroyed, expected);
    assert_eq!(device.live_image_count(), 0);
    assert!(registry.is_empty());
    assert_eq!(registry.color_attachment_count(), 0);
    assert!(registry.depth_attachment().is_none());
}

#[test]
fn test_discard_all_queues_images_in_creation_order() {
    let queue = ReleaseQueue::new();
    let (mut device, fb, _) = setup();
    let mut registry = AttachmentRegistry::new(queue.clone(), SamplerState::default());
    attach(&mut registry, &mut device, fb, "position", RGB32F).unwrap();
    attach(&mut registry, &mut device, fb, "depth", DEPTH).unwrap();
    let expected: Vec<_> = registry.iter().map(|a| PendingRelease::Image(a.image())).collect();

    registry.discard_all();

    assert!(registry.is_empty());
    assert!(registry.depth_attachment().is_none());
    assert_eq!(queue.take(), expected);
    // Nothing was released on the device yet
    assert_eq!(device.live_image_count(), 2);
}

#[test]
fn test_release_all_queues_nothing() {
    let queue = ReleaseQueue::new();
    let (mut device, fb, _) = setup();
    let mut registry = AttachmentRegistry::new(queue.clone(), SamplerState::default());
    attach(&mut registry, &mut device, fb, "diffuse", RGB32F).unwrap();

    registry.release_all(&mut device);
    drop(registry);

    assert!(queue.is_empty());
}

// ============================================================================
// SAMPLER
// ============================================================================

#[test]
fn test_images_use_registry_sampler() {
    let sampler = SamplerState { filter: ImageFilter::Nearest, wrap: ImageWrap::Repeat };
    let (mut device, fb, _) = setup();
    let mut registry = AttachmentRegistry::new(ReleaseQueue::new(), sampler);
    attach(&mut registry, &mut device, fb, "normal", RGB32F).unwrap();

    assert_eq!(registry.sampler(), sampler);
    let info = device.image_info(registry.get("normal").unwrap().image()).unwrap();
    assert_eq!((info.filter, info.wrap), (ImageFilter::Nearest, ImageWrap::Repeat));

    registry.release_all(&mut device);
}
