use std::sync::Arc;

use gizmo_core::math::Pose;

use crate::error::{GizmoError, GizmoResult};
use crate::geometry::{GizmoGeometry, GizmoMesh};
use crate::material::GizmoMaterial;
use crate::replay::{GizmoDevice, ReplayStats, Replayer};
use crate::settings::GizmoSettings;
use crate::stream::CommandStream;

/// Something that records gizmos once per recording phase.
///
/// Closures `FnMut(&mut CommandStream) -> GizmoResult<()>` implement it.
pub trait GizmoProducer {
    /// Record this producer's gizmos into `stream`.
    ///
    /// The stream starts at the identity matrix and opaque white. Do not
    /// keep it past the call.
    fn record_draw_calls(&mut self, stream: &mut CommandStream) -> GizmoResult<()>;

    /// Name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Disabled producers are skipped.
    fn is_enabled(&self) -> bool {
        true
    }
}

impl<F> GizmoProducer for F
where
    F: FnMut(&mut CommandStream) -> GizmoResult<()>,
{
    fn record_draw_calls(&mut self, stream: &mut CommandStream) -> GizmoResult<()> {
        self(stream)
    }
}

/// Handle returned by [`GizmoManager::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProducerId(u64);

/// Lifecycle state of a [`GizmoManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    Inactive,
    Active,
}

type BoxedProducer = Box<dyn GizmoProducer + Send>;

/// Streams and resources that only exist while active.
struct ActiveBuffers {
    streams: [CommandStream; 2],
    front: usize,
    geometry: Arc<GizmoGeometry>,
    material: GizmoMaterial,
    circle_resolution: u32,
    warn_on_unbalanced_stack: bool,
    /// A back stream was handed out since the last swap.
    ready_for_swap: bool,
}

impl ActiveBuffers {
    fn back_index(&self) -> usize {
        1 - self.front
    }

    /// The back stream, reset to default state with the observer and the
    /// configured stream settings installed.
    fn prepared_back(&mut self, observer: Option<Pose>) -> &mut CommandStream {
        let back = &mut self.streams[1 - self.front];
        back.reset_state();
        back.set_observer(observer);
        back.set_circle_resolution(self.circle_resolution);
        back.set_warn_on_unbalanced_stack(self.warn_on_unbalanced_stack);
        back
    }

    /// Swap front and back. Returns `false` if the outgoing back stream
    /// recorded a guard violation while it was the front.
    fn swap(&mut self) -> bool {
        self.front = self.back_index();
        let back_index = self.back_index();
        self.streams[self.front].begin_guard();
        let back = &mut self.streams[back_index];
        let clean = back.end_guard().is_ok();
        back.clear();
        clean
    }
}

/// Double-buffered gizmo coordinator.
///
/// Producers record into the back stream while the front stream is
/// replayed. [`present`](Self::present) swaps the two once per recorded
/// frame, so every recorded frame is replayed in full and without
/// tearing, as many times as the host presents it.
///
/// ```ignore
/// let mut gizmos = GizmoManager::new(GizmoSettings::default());
/// gizmos.activate();
/// gizmos.register(|stream: &mut CommandStream| {
///     stream.set_color(Color::RED);
///     stream.draw_line(Vec3::zeros(), Vec3::x());
///     Ok(())
/// });
///
/// // Each frame:
/// gizmos.set_observer(camera_pose);
/// gizmos.record();
/// gizmos.present(&mut device)?;
/// ```
pub struct GizmoManager {
    settings: GizmoSettings,
    active: Option<ActiveBuffers>,
    producers: Vec<(ProducerId, BoxedProducer)>,
    late_producers: Vec<(ProducerId, BoxedProducer)>,
    next_id: u64,
    observer: Option<Pose>,
    replayer: Replayer,
    frame: u64,
    guard_violations: u64,
}

impl GizmoManager {
    /// Create an inactive manager.
    pub fn new(settings: GizmoSettings) -> Self {
        Self {
            settings,
            active: None,
            producers: Vec::new(),
            late_producers: Vec::new(),
            next_id: 0,
            observer: None,
            replayer: Replayer::new(),
            frame: 0,
            guard_violations: 0,
        }
    }

    pub fn settings(&self) -> &GizmoSettings {
        &self.settings
    }

    /// Activate with the configured material and no sphere mesh.
    pub fn activate(&mut self) {
        self.activate_with(None, None);
    }

    /// Activate: allocate both streams and generate the shared geometry.
    ///
    /// `material` overrides the configured one; an unusable material falls
    /// back to the built-in one. Activating an active manager starts over
    /// with fresh streams.
    pub fn activate_with(&mut self, material: Option<GizmoMaterial>, sphere: Option<GizmoMesh>) {
        if !self.settings.enabled {
            log::info!("Gizmos are disabled in settings; not activating");
            return;
        }
        if self.active.is_some() {
            log::warn!("Gizmo manager activated twice; discarding recorded gizmos");
        }

        let material = GizmoMaterial::resolve(material.or_else(|| self.settings.material.clone()));
        let resolution = self.settings.circle_resolution;
        let warn_on_unbalanced_stack = self.settings.warn_on_unbalanced_stack;
        let geometry = Arc::new(GizmoGeometry::generate(resolution, sphere));
        let make_stream = || {
            let mut stream =
                CommandStream::with_geometry(Arc::clone(&geometry)).with_circle_resolution(resolution);
            stream.set_warn_on_unbalanced_stack(warn_on_unbalanced_stack);
            stream
        };
        let mut streams = [make_stream(), make_stream()];
        // Nothing has been swapped in yet, so nothing may draw to the front.
        streams[0].begin_guard();

        log::debug!("Gizmo manager activated with material \"{}\"", material.name);
        self.active = Some(ActiveBuffers {
            streams,
            front: 0,
            geometry,
            material,
            circle_resolution: resolution.max(3),
            warn_on_unbalanced_stack,
            ready_for_swap: false,
        });
    }

    /// Drop both streams and the geometry.
    pub fn deactivate(&mut self) {
        if self.active.take().is_some() {
            log::debug!("Gizmo manager deactivated after {} frame(s)", self.frame);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn state(&self) -> ManagerState {
        if self.is_active() {
            ManagerState::Active
        } else {
            ManagerState::Inactive
        }
    }

    // ---- Producers -------------------------------------------------------

    /// Register a producer invoked by [`record`](Self::record), in
    /// registration order.
    pub fn register<P: GizmoProducer + Send + 'static>(&mut self, producer: P) -> ProducerId {
        let id = self.next_producer_id();
        self.producers.push((id, Box::new(producer)));
        id
    }

    /// Register a producer invoked on the back stream right before each swap.
    pub fn register_late<P: GizmoProducer + Send + 'static>(&mut self, producer: P) -> ProducerId {
        let id = self.next_producer_id();
        self.late_producers.push((id, Box::new(producer)));
        id
    }

    /// Remove a producer. Returns `false` for an unknown id.
    pub fn unregister(&mut self, id: ProducerId) -> bool {
        let before = self.producer_count();
        self.producers.retain(|(pid, _)| *pid != id);
        self.late_producers.retain(|(pid, _)| *pid != id);
        self.producer_count() != before
    }

    /// Number of registered producers, late ones included.
    pub fn producer_count(&self) -> usize {
        self.producers.len() + self.late_producers.len()
    }

    fn next_producer_id(&mut self) -> ProducerId {
        let id = ProducerId(self.next_id);
        self.next_id += 1;
        id
    }

    // ---- Recording -------------------------------------------------------

    /// World pose of the camera used by camera-aware gizmos.
    pub fn set_observer(&mut self, observer: Pose) {
        self.observer = Some(observer);
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    pub fn observer(&self) -> Option<&Pose> {
        self.observer.as_ref()
    }

    /// The writable stream for this recording phase.
    ///
    /// Every query resets the matrix and color, so each caller starts clean.
    /// `None` while inactive.
    pub fn back_stream(&mut self) -> Option<&mut CommandStream> {
        let observer = self.observer;
        let buffers = self.active.as_mut()?;
        buffers.ready_for_swap = true;
        Some(buffers.prepared_back(observer))
    }

    /// Run the recording phase: invoke every enabled producer in order.
    ///
    /// A failing producer is logged and does not stop the others. Returns
    /// the number of failures.
    pub fn record(&mut self) -> usize {
        let observer = self.observer;
        let Some(buffers) = self.active.as_mut() else {
            log::warn!("{}; nothing recorded", GizmoError::Inactive);
            return 0;
        };
        buffers.ready_for_swap = true;
        run_producers(&mut self.producers, buffers, observer)
    }

    // ---- Presentation ----------------------------------------------------

    /// Present the most recently completed frame to `device`.
    ///
    /// If anything was recorded since the last call, late producers run on
    /// the back stream and the streams swap first. Otherwise the current
    /// front stream is replayed again. With `display` off in the settings
    /// the streams still swap but the device is not touched.
    pub fn present<D: GizmoDevice + ?Sized>(&mut self, device: &mut D) -> GizmoResult<ReplayStats> {
        let observer = self.observer;
        let Some(buffers) = self.active.as_mut() else {
            return Err(GizmoError::Inactive);
        };

        if buffers.ready_for_swap {
            run_producers(&mut self.late_producers, buffers, observer);
            if !buffers.swap() {
                self.guard_violations += 1;
            }
            buffers.ready_for_swap = false;
            self.frame += 1;
            log::trace!(
                "Gizmo frame {} swapped in with {} operation(s)",
                self.frame,
                buffers.streams[buffers.front].operation_count()
            );
        }

        if !self.settings.display {
            return Ok(ReplayStats::default());
        }

        let front = &buffers.streams[buffers.front];
        Ok(self.replayer.replay(front, &buffers.material, device))
    }

    /// The stream being replayed.
    pub fn front_stream(&self) -> Option<&CommandStream> {
        self.active.as_ref().map(|b| &b.streams[b.front])
    }

    pub fn geometry(&self) -> Option<&Arc<GizmoGeometry>> {
        self.active.as_ref().map(|b| &b.geometry)
    }

    pub fn material(&self) -> Option<&GizmoMaterial> {
        self.active.as_ref().map(|b| &b.material)
    }

    /// Number of completed swaps.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Number of swaps that found writes to a guarded stream.
    pub fn guard_violations(&self) -> u64 {
        self.guard_violations
    }
}

fn run_producers(
    producers: &mut [(ProducerId, BoxedProducer)],
    buffers: &mut ActiveBuffers,
    observer: Option<Pose>,
) -> usize {
    let mut failures = 0;
    for (_, producer) in producers.iter_mut() {
        if !producer.is_enabled() {
            continue;
        }
        let stream = buffers.prepared_back(observer);
        if let Err(e) = producer.record_draw_calls(stream) {
            let err = GizmoError::Producer {
                name: producer.name().to_owned(),
                message: e.to_string(),
            };
            log::error!("{err}");
            failures += 1;
        }
    }
    failures
}

impl std::fmt::Debug for GizmoManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GizmoManager")
            .field("state", &self.state())
            .field("producers", &self.producer_count())
            .field("frame", &self.frame)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use gizmo_core::Color;
    use gizmo_core::math::{Mat4, Vec3};

    use super::*;
    use crate::material::GizmoPass;
    use crate::replay::WorldLine;
    use crate::stream::Operation;

    #[derive(Default)]
    struct CountingDevice {
        passes: usize,
        lines: usize,
        meshes: usize,
    }

    impl GizmoDevice for CountingDevice {
        fn set_pass(&mut self, _: &GizmoMaterial, _: GizmoPass, _: Color) {
            self.passes += 1;
        }
        fn set_wireframe(&mut self, _: bool) {}
        fn draw_lines(&mut self, lines: &[WorldLine]) {
            self.lines += lines.len();
        }
        fn draw_mesh(&mut self, _: &GizmoMesh, _: &Mat4) {
            self.meshes += 1;
        }
    }

    struct Failing;

    impl GizmoProducer for Failing {
        fn record_draw_calls(&mut self, stream: &mut CommandStream) -> GizmoResult<()> {
            stream.pop_matrix()
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct Disabled;

    impl GizmoProducer for Disabled {
        fn record_draw_calls(&mut self, stream: &mut CommandStream) -> GizmoResult<()> {
            stream.draw_line(Vec3::zeros(), Vec3::x());
            Ok(())
        }

        fn is_enabled(&self) -> bool {
            false
        }
    }

    fn active_manager() -> GizmoManager {
        let mut manager = GizmoManager::new(GizmoSettings::default());
        manager.activate();
        manager
    }

    fn line_producer(stream: &mut CommandStream) -> GizmoResult<()> {
        stream.draw_line(Vec3::zeros(), Vec3::y());
        Ok(())
    }

    #[test]
    fn test_inactive_manager() {
        let mut manager = GizmoManager::new(GizmoSettings::default());
        assert_eq!(manager.state(), ManagerState::Inactive);
        assert!(manager.back_stream().is_none());
        assert_eq!(manager.record(), 0);
        assert_eq!(
            manager.present(&mut CountingDevice::default()),
            Err(GizmoError::Inactive)
        );
    }

    #[test]
    fn test_activation_guards_front() {
        let mut manager = active_manager();
        assert_eq!(manager.state(), ManagerState::Active);
        assert!(manager.front_stream().unwrap().is_guarded());
        assert!(!manager.back_stream().unwrap().is_guarded());
        assert_eq!(manager.material(), Some(&GizmoMaterial::default_gizmo()));

        manager.deactivate();
        assert!(!manager.is_active());
        assert!(manager.geometry().is_none());
    }

    #[test]
    fn test_disabled_settings_do_not_activate() {
        let settings = GizmoSettings {
            enabled: false,
            ..GizmoSettings::default()
        };
        let mut manager = GizmoManager::new(settings);
        manager.activate();
        assert!(!manager.is_active());
    }

    #[test]
    fn test_invalid_configured_material_falls_back() {
        let settings = GizmoSettings {
            material: Some(GizmoMaterial::new("Broken", vec![])),
            ..GizmoSettings::default()
        };
        let mut manager = GizmoManager::new(settings);
        manager.activate();
        assert_eq!(manager.material(), Some(&GizmoMaterial::default_gizmo()));
    }

    #[test]
    fn test_swap_exposes_recorded_operations() {
        let mut manager = active_manager();
        let stream = manager.back_stream().unwrap();
        for i in 0..5 {
            stream.draw_line(Vec3::zeros(), Vec3::repeat(i as f32));
        }

        let mut device = CountingDevice::default();
        let stats = manager.present(&mut device).unwrap();

        assert_eq!(manager.frame(), 1);
        assert_eq!(manager.front_stream().unwrap().operation_count(), 5);
        assert!(manager.front_stream().unwrap().is_guarded());
        assert_eq!(stats.lines, 5);
        assert_eq!(device.lines, 5);
        assert!(manager.back_stream().unwrap().is_empty());
    }

    #[test]
    fn test_present_without_recording_replays_same_frame() {
        let mut manager = active_manager();
        manager.register(line_producer);
        manager.record();

        let mut device = CountingDevice::default();
        manager.present(&mut device).unwrap();
        manager.present(&mut device).unwrap();

        assert_eq!(manager.frame(), 1);
        assert_eq!(device.lines, 2);
    }

    #[test]
    fn test_producers_start_from_clean_state() {
        let mut manager = active_manager();
        manager.register(|stream: &mut CommandStream| {
            stream.set_color(Color::RED);
            stream.draw_line(Vec3::zeros(), Vec3::x());
            Ok(())
        });
        manager.register(|stream: &mut CommandStream| {
            assert_eq!(stream.color(), Color::WHITE);
            stream.draw_line(Vec3::zeros(), Vec3::y());
            Ok(())
        });

        assert_eq!(manager.record(), 0);
        manager.present(&mut CountingDevice::default()).unwrap();

        assert_eq!(
            manager.front_stream().unwrap().operations(),
            &[
                Operation::SetColor,
                Operation::DrawLine,
                Operation::SetColor,
                Operation::DrawLine,
            ]
        );
        assert_eq!(
            manager.front_stream().unwrap().colors(),
            &[Color::RED, Color::WHITE]
        );
    }

    #[test]
    fn test_failing_producer_does_not_stop_others() {
        let mut manager = active_manager();
        manager.register(Failing);
        manager.register(Disabled);
        manager.register(line_producer);

        assert_eq!(manager.record(), 1);
        manager.present(&mut CountingDevice::default()).unwrap();
        assert_eq!(manager.front_stream().unwrap().lines().len(), 1);
    }

    #[test]
    fn test_unregister() {
        let mut manager = active_manager();
        let a = manager.register(line_producer);
        let b = manager.register_late(line_producer);
        assert_eq!(manager.producer_count(), 2);
        assert!(manager.unregister(a));
        assert!(!manager.unregister(a));
        assert!(manager.unregister(b));
        assert_eq!(manager.producer_count(), 0);
    }

    #[test]
    fn test_late_producers_join_the_presented_frame() {
        let mut manager = active_manager();
        manager.register(line_producer);
        manager.register_late(|stream: &mut CommandStream| {
            stream.draw_line(Vec3::zeros(), Vec3::z());
            Ok(())
        });

        // Late producers only run when there is a frame to swap in.
        manager.present(&mut CountingDevice::default()).unwrap();
        assert_eq!(manager.frame(), 0);

        manager.record();
        manager.present(&mut CountingDevice::default()).unwrap();
        let lines = manager.front_stream().unwrap().lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].b, Vec3::z());
    }

    #[test]
    fn test_observer_reaches_back_stream() {
        let mut manager = active_manager();
        manager.set_observer(Pose::translation(0.0, 0.0, 5.0));
        let stream = manager.back_stream().unwrap();
        assert_eq!(stream.observer(), Some(&Pose::translation(0.0, 0.0, 5.0)));

        manager.clear_observer();
        assert!(manager.back_stream().unwrap().observer().is_none());
    }

    #[test]
    fn test_display_off_swaps_without_drawing() {
        let settings = GizmoSettings {
            display: false,
            ..GizmoSettings::default()
        };
        let mut manager = GizmoManager::new(settings);
        manager.activate();
        manager.register(line_producer);
        manager.record();

        let mut device = CountingDevice::default();
        let stats = manager.present(&mut device).unwrap();
        assert_eq!(stats, ReplayStats::default());
        assert_eq!(device.lines, 0);
        assert_eq!(manager.frame(), 1);
        assert!(manager.back_stream().unwrap().is_empty());
    }

    #[test]
    fn test_geometry_shared_by_both_streams() {
        let mut manager = active_manager();
        let geometry = Arc::clone(manager.geometry().unwrap());
        assert!(Arc::ptr_eq(manager.front_stream().unwrap().geometry(), &geometry));
        assert!(Arc::ptr_eq(manager.back_stream().unwrap().geometry(), &geometry));
        assert_eq!(manager.guard_violations(), 0);
    }

    #[test]
    fn test_stream_settings_survive_producer_changes() {
        let mut manager = active_manager();
        let expected = manager.settings().circle_resolution as usize;
        let mut first = true;
        manager.register(move |stream: &mut CommandStream| {
            if first {
                stream.set_circle_resolution(4);
                stream.set_warn_on_unbalanced_stack(false);
                first = false;
            }
            Ok(())
        });
        manager.register(|stream: &mut CommandStream| {
            stream.draw_wire_circle(Vec3::zeros(), Vec3::y(), 1.0);
            Ok(())
        });

        let lines: Vec<usize> = (0..4)
            .map(|_| {
                manager.record();
                manager.present(&mut CountingDevice::default()).unwrap().lines
            })
            .collect();
        assert_eq!(lines, vec![expected; 4]);
    }

    #[test]
    fn test_write_to_guarded_front_is_counted() {
        let mut manager = active_manager();
        manager.register(line_producer);
        manager.record();
        manager.present(&mut CountingDevice::default()).unwrap();
        assert_eq!(manager.guard_violations(), 0);

        let buffers = manager.active.as_mut().unwrap();
        let front = buffers.front;
        buffers.streams[front].draw_line(Vec3::zeros(), Vec3::x());

        manager.record();
        let mut device = CountingDevice::default();
        let stats = manager.present(&mut device).unwrap();
        assert_eq!(manager.guard_violations(), 1);
        assert_eq!(manager.frame(), 2);
        assert_eq!(stats.lines, 1);
        assert_eq!(device.lines, 1);
        // The offending stream was cleared and now records the next frame.
        assert!(manager.back_stream().unwrap().is_empty());
    }
}
