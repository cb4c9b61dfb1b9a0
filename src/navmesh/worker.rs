//! Handoff to the downstream voxel/contour/poly/detail-mesh/detour
//! pipeline, invoked through a thin adapter this crate does not
//! implement. The main-thread half owns the triangle-soup and
//! off-mesh-connection buffers until it calls [`spawn_solve`], at which
//! point ownership moves to a worker thread; completion is reported back
//! over an `mpsc` channel regardless of success or failure.

use std::sync::mpsc::{self, Receiver};
use std::thread;

use crate::config::NavmeshSolverConfig;
use crate::error::{MapError, MapResult};

use super::links::{NavMeshArea, OffMeshLink};
use super::stroke::NavVertex;

/// The immutable triangle-soup + off-mesh-connection buffers the
/// main-thread half hands to the worker. `parry3d`-style numeric types
/// (`f32` vertices, `u32` indices) match the precision
/// `oxidized_navigation` uses for its own heightfield/mesh buffers.
///
/// `areas` runs parallel to `triangles` (`areas[i]` classifies
/// `triangles[i]`), per §4.H step 5's "hand vertex/triangle/area arrays
/// to the downstream voxel/contour/poly/detail-mesh/detour pipeline".
#[derive(Clone, Debug, Default)]
pub struct NavMeshGeometry {
    pub vertices: Vec<NavVertex>,
    pub triangles: Vec<[u32; 3]>,
    pub areas: Vec<NavMeshArea>,
    pub links: Vec<OffMeshLink>,
}

impl NavMeshGeometry {
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// The adapter this crate calls for the voxelize/contour/poly/detail/
/// detour half of navmesh building — the solid-voxel mesh generator
/// itself is out of scope; implementors wrap whatever real solver a
/// host application links in.
pub trait SolidVoxelNavmeshBackend: Send {
    /// Opaque solved-mesh output type; this crate neither inspects nor
    /// constructs it, only threads it back to the caller.
    type Output: Send + 'static;

    fn solve(&self, geometry: &NavMeshGeometry, config: &NavmeshSolverConfig) -> Result<Self::Output, String>;
}

/// Spawns the solve phase on a worker thread, consuming `geometry` and
/// `config` by ownership transfer. Returns a [`Receiver`] the caller
/// polls or blocks on to retrieve the result once the worker is done;
/// the message is sent regardless of success or failure, wrapped as
/// [`MapError::NavmeshStageFailed`] on error.
pub fn spawn_solve<B>(backend: B, geometry: NavMeshGeometry, config: NavmeshSolverConfig) -> Receiver<MapResult<B::Output>>
where
    B: SolidVoxelNavmeshBackend + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = backend.solve(&geometry, &config).map_err(|stage_error| {
            log::warn!("navmesh solve stage failed, discarding partial navmesh: {stage_error}");
            MapError::NavmeshStageFailed(stage_error)
        });
        // The receiver may have been dropped if the caller stopped
        // waiting; there is nothing to do about that here.
        let _ = tx.send(result);
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoBackend;

    impl SolidVoxelNavmeshBackend for EchoBackend {
        type Output = usize;

        fn solve(&self, geometry: &NavMeshGeometry, _config: &NavmeshSolverConfig) -> Result<usize, String> {
            Ok(geometry.triangles.len())
        }
    }

    struct FailingBackend;

    impl SolidVoxelNavmeshBackend for FailingBackend {
        type Output = ();

        fn solve(&self, _geometry: &NavMeshGeometry, _config: &NavmeshSolverConfig) -> Result<(), String> {
            Err("voxelizer exploded".to_string())
        }
    }

    #[test]
    fn solve_handoff_returns_the_backends_result() {
        let geometry = NavMeshGeometry {
            vertices: vec![],
            triangles: vec![[0, 1, 2]],
            areas: vec![NavMeshArea::Walkable],
            links: vec![],
        };
        let rx = spawn_solve(EchoBackend, geometry, NavmeshSolverConfig::default());
        let result = rx.recv().expect("worker sends a result").expect("backend succeeds");
        assert_eq!(result, 1);
    }

    #[test]
    fn solve_failure_is_reported_as_navmesh_stage_failed() {
        let rx = spawn_solve(FailingBackend, NavMeshGeometry::default(), NavmeshSolverConfig::default());
        let result = rx.recv().expect("worker sends a result");
        assert!(matches!(result, Err(MapError::NavmeshStageFailed(_))));
    }
}
