//! The contact effector facade.
//!
//! One instance owns the body list and answers the outer integrator.
//! `update_state` runs once per macro-step: it re-reads body states,
//! predicts the coming step, and prunes with the broad and mid phases.
//! `compute_force_torque` runs once per body per sub-step: narrow-phase
//! detection and impulse resolution for the leading body of a close
//! pair, queued action-reaction delivery for its partner, and the
//! pseudo-random rejection signal when the integrator has stepped too
//! deep through a surface.

use std::path::Path;

use glam::DVec3;
use kessler_contact::{
    broad, cull_cluster_pairs, BodyMotion, Manifold, NarrowInputs, NarrowPhase, SweptPose,
};
use kessler_mesh::{build_clusters, load_obj, TriangleMesh};
use kessler_solver::{assemble_delassus, BodyInertia, ContactFrame, SolverConfig, StrongeSolver};
use kessler_telemetry::{ContactEvent, EventBus, EventKind};
use kessler_types::constants::TIME_MATCH_TOL;
use kessler_types::{BodyId, ClusterId, KesslerResult, Scalar};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::body::{
    Body, BodyKind, BodyStates, KinematicStateInput, PendingImpulse, SpacecraftStateInput,
};
use crate::config::EffectorConfig;
use crate::cycle::{CycleState, SlotAnswer, SolutionSlot};
use crate::materials::PairCoefficients;
use crate::predictor::propagate;

/// The per-call output of the effector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyForces {
    /// External force, inertial frame (N).
    pub force_n: DVec3,
    /// External force, body frame, kept zero; the contact force is
    /// reported in the inertial frame only.
    pub force_b: DVec3,
    /// External torque about the body origin, body frame (N·m).
    pub torque_b: DVec3,
}

impl BodyForces {
    /// The all-zero response.
    pub fn zero() -> Self {
        Self {
            force_n: DVec3::ZERO,
            force_b: DVec3::ZERO,
            torque_b: DVec3::ZERO,
        }
    }
}

/// A close body pair with its surviving cluster pairs.
#[derive(Debug, Clone)]
struct ClosePair {
    a: usize,
    b: usize,
    cluster_pairs: Vec<(ClusterId, ClusterId)>,
}

/// The rigid-body contact effector.
pub struct ContactEffector {
    config: EffectorConfig,
    bodies: Vec<Body>,
    pair_coefficients: PairCoefficients,
    close_pairs: Vec<ClosePair>,
    cycle: CycleState,
    rng: StdRng,
    telemetry: EventBus,
    current_sim_time: Scalar,
}

impl ContactEffector {
    /// Creates an effector with the given configuration.
    pub fn new(config: EffectorConfig) -> KesslerResult<Self> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.rng_seed);
        Ok(Self {
            config,
            bodies: Vec::new(),
            pair_coefficients: PairCoefficients::new(),
            close_pairs: Vec::new(),
            cycle: CycleState::reset(),
            rng,
            telemetry: EventBus::new(),
            current_sim_time: 0.0,
        })
    }

    fn register(
        &mut self,
        kind: BodyKind,
        tag: &str,
        mesh: TriangleMesh,
        bounding_radius: Scalar,
        restitution: Scalar,
        friction: Scalar,
    ) -> KesslerResult<BodyId> {
        mesh.validate()?;
        let clusters = build_clusters(
            &mesh,
            self.config.max_bounding_box_dim,
            self.config.min_bounding_box_dim,
        )?;
        tracing::debug!(
            tag,
            clusters = clusters.len(),
            triangles = mesh.triangle_count(),
            "registered contact body"
        );
        self.bodies.push(Body::new(
            kind,
            tag.to_owned(),
            mesh,
            clusters,
            bounding_radius,
            restitution,
            friction,
        ));
        Ok(BodyId((self.bodies.len() - 1) as u32))
    }

    /// Registers a spacecraft body from an already built mesh.
    pub fn add_spacecraft_mesh(
        &mut self,
        tag: &str,
        mesh: TriangleMesh,
        bounding_radius: Scalar,
        restitution: Scalar,
        friction: Scalar,
    ) -> KesslerResult<BodyId> {
        self.register(
            BodyKind::Spacecraft,
            tag,
            mesh,
            bounding_radius,
            restitution,
            friction,
        )
    }

    /// Registers a spacecraft body from a Wavefront .obj file.
    pub fn add_spacecraft<P: AsRef<Path>>(
        &mut self,
        obj_file: P,
        tag: &str,
        bounding_radius: Scalar,
        restitution: Scalar,
        friction: Scalar,
    ) -> KesslerResult<BodyId> {
        let mesh = load_obj(obj_file)?;
        self.add_spacecraft_mesh(tag, mesh, bounding_radius, restitution, friction)
    }

    /// Registers a kinematic (rails-driven) body from a mesh.
    pub fn add_kinematic_mesh(
        &mut self,
        tag: &str,
        mesh: TriangleMesh,
        bounding_radius: Scalar,
        restitution: Scalar,
        friction: Scalar,
    ) -> KesslerResult<BodyId> {
        self.register(
            BodyKind::Kinematic,
            tag,
            mesh,
            bounding_radius,
            restitution,
            friction,
        )
    }

    /// Registers a kinematic body from a Wavefront .obj file.
    pub fn add_kinematic<P: AsRef<Path>>(
        &mut self,
        obj_file: P,
        tag: &str,
        bounding_radius: Scalar,
        restitution: Scalar,
        friction: Scalar,
    ) -> KesslerResult<BodyId> {
        let mesh = load_obj(obj_file)?;
        self.add_kinematic_mesh(tag, mesh, bounding_radius, restitution, friction)
    }

    /// Overrides the contact coefficients for one body pair.
    pub fn set_pair_coefficients(
        &mut self,
        a: BodyId,
        b: BodyId,
        restitution: Scalar,
        friction: Scalar,
    ) {
        self.pair_coefficients.set(a, b, restitution, friction);
    }

    /// Read access to a registered body.
    pub fn body(&self, id: BodyId) -> &Body {
        &self.bodies[id.index()]
    }

    /// Number of registered bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Applies a macro-step state write for a spacecraft body.
    pub fn write_spacecraft_state(&mut self, id: BodyId, input: &SpacecraftStateInput) {
        self.bodies[id.index()].write_spacecraft_state(input);
    }

    /// Applies a macro-step state write for a kinematic body.
    pub fn write_kinematic_state(&mut self, id: BodyId, input: &KinematicStateInput) {
        self.bodies[id.index()].write_kinematic_state(input);
    }

    /// The telemetry bus; register sinks here and `flush()` as desired.
    pub fn telemetry_mut(&mut self) -> &mut EventBus {
        &mut self.telemetry
    }

    /// Macro-step update: resets sub-step bookkeeping, predicts every
    /// body one outer cadence ahead, and runs the broad and mid phases.
    pub fn update_state(&mut self, sim_time: Scalar) {
        self.current_sim_time = sim_time;
        self.cycle = CycleState::reset();

        for body in &mut self.bodies {
            body.slot = SolutionSlot::None;
            body.pending.clear();
            body.future = propagate(&body.states, body.kind, self.config.sim_time_step);
        }

        let sweeps: Vec<broad::SphereSweep> = self
            .bodies
            .iter()
            .map(|body| broad::SphereSweep {
                r_now: body.states.r_bn_n,
                r_next: body.future.r_bn_n,
                radius: body.bounding_radius,
            })
            .collect();
        let pairs = broad::close_pairs(&sweeps);
        self.telemetry.emit(ContactEvent::new(
            sim_time,
            EventKind::BroadPhase {
                close_pairs: pairs.len() as u32,
            },
        ));

        self.close_pairs = pairs
            .into_iter()
            .map(|(a, b)| {
                let pose_a = Self::macro_sweep(&self.bodies[a]);
                let pose_b = Self::macro_sweep(&self.bodies[b]);
                let cluster_pairs = cull_cluster_pairs(
                    &self.bodies[a].clusters,
                    &self.bodies[b].clusters,
                    &pose_a,
                    &pose_b,
                    self.config.bounding_box_ff,
                );
                self.telemetry.emit(ContactEvent::new(
                    sim_time,
                    EventKind::CoarsePairs {
                        body_a: BodyId(a as u32),
                        body_b: BodyId(b as u32),
                        cluster_pairs: cluster_pairs.len() as u32,
                    },
                ));
                ClosePair {
                    a,
                    b,
                    cluster_pairs,
                }
            })
            .collect();
    }

    /// Sub-step query: the contact force and torque acting on `body`
    /// over `[time, time + step]`.
    pub fn compute_force_torque(&mut self, body: BodyId, time: Scalar, step: Scalar) -> BodyForces {
        self.cycle.observe(time, step);

        let idx = body.index();
        if idx >= self.bodies.len() || self.bodies[idx].is_kinematic() {
            return BodyForces::zero();
        }

        let locked_empty = match self.bodies[idx].slot.answer(time, step) {
            SlotAnswer::Replay { force_n, torque_b } => {
                return BodyForces {
                    force_n,
                    force_b: DVec3::ZERO,
                    torque_b,
                }
            }
            SlotAnswer::RecomputeLockedEmpty => true,
            SlotAnswer::Recompute => false,
        };

        if let Some(pair_idx) = self.close_pairs.iter().position(|p| p.a == idx) {
            self.solve_leading(pair_idx, time, step, locked_empty)
        } else if let Some(pair_idx) = self.close_pairs.iter().position(|p| p.b == idx) {
            self.deliver_partner(pair_idx, time, step)
        } else {
            BodyForces::zero()
        }
    }

    /// Swept pose over the macro-step horizon (states → future).
    fn macro_sweep(body: &Body) -> SweptPose {
        SweptPose {
            r_now: body.states.r_bn_n,
            r_next: body.future.r_bn_n,
            dcm_nb_now: body.states.dcm_nb,
            dcm_nb_next: body.future.dcm_nb,
        }
    }

    /// Narrow phase plus impulse solve for the leading body of a pair.
    fn solve_leading(
        &mut self,
        pair_idx: usize,
        time: Scalar,
        step: Scalar,
        locked_empty: bool,
    ) -> BodyForces {
        let a = self.close_pairs[pair_idx].a;
        let b = self.close_pairs[pair_idx].b;
        let tau = time - self.current_sim_time;

        let cur_a = propagate(&self.bodies[a].states, self.bodies[a].kind, tau);
        let fut_a = propagate(&cur_a, self.bodies[a].kind, step);
        let cur_b = propagate(&self.bodies[b].states, self.bodies[b].kind, tau);
        let fut_b = propagate(&cur_b, self.bodies[b].kind, step);

        let manifold = self.detect(pair_idx, &cur_a, &fut_a, &cur_b, &fut_b);
        self.telemetry.emit(ContactEvent::new(
            time,
            EventKind::ContactDetection {
                body_a: BodyId(a as u32),
                body_b: BodyId(b as u32),
                contact_count: manifold.len() as u32,
                max_error: manifold.max_error,
            },
        ));

        if manifold.is_empty() {
            self.bodies[a].slot = SolutionSlot::Empty {
                time,
                time_found: time + step + TIME_MATCH_TOL,
                step,
            };
            return BodyForces::zero();
        }

        if locked_empty || manifold.max_error > self.config.max_pos_error {
            let (force_n, torque_b) = self.rejection_draw(step);
            self.bodies[a].slot = SolutionSlot::Rejected {
                force_n,
                torque_b,
                time_found: time + step + TIME_MATCH_TOL,
                step,
            };
            self.telemetry.emit(ContactEvent::new(
                time,
                EventKind::StepRejection {
                    body: BodyId(a as u32),
                    time,
                    step,
                },
            ));
            return BodyForces {
                force_n,
                force_b: DVec3::ZERO,
                torque_b,
            };
        }

        // Local contact frames, seeded from body B's attitude.
        let frames: Vec<ContactFrame> = manifold
            .contacts()
            .iter()
            .map(|c| ContactFrame::build(c.normal, &cur_b.dcm_nb))
            .collect();
        let points_a: Vec<DVec3> = manifold.contacts().iter().map(|c| c.point_a).collect();
        let points_b: Vec<DVec3> = manifold.contacts().iter().map(|c| c.point_b).collect();

        let motion_a = Self::motion(&cur_a);
        let motion_b = Self::motion(&cur_b);
        let initial_velocities: Vec<DVec3> = manifold
            .contacts()
            .iter()
            .zip(&frames)
            .map(|(c, frame)| {
                frame.to_contact(
                    motion_a.point_velocity(c.point_a) - motion_b.point_velocity(c.point_b),
                )
            })
            .collect();

        // Contact arms are taken about the centre of mass, which sits
        // at the body origin plus the reported offset.
        let inertia_a = BodyInertia {
            inv_mass: 1.0 / self.bodies[a].states.mass,
            inv_inertia_b: self.bodies[a].states.inertia_inv_b,
            dcm_nb: cur_a.dcm_nb,
            com_n: cur_a.r_bn_n + cur_a.dcm_nb * self.bodies[a].states.c_b,
        };
        let inertia_b = if self.bodies[b].is_kinematic() {
            None
        } else {
            Some(BodyInertia {
                inv_mass: 1.0 / self.bodies[b].states.mass,
                inv_inertia_b: self.bodies[b].states.inertia_inv_b,
                dcm_nb: cur_b.dcm_nb,
                com_n: cur_b.r_bn_n + cur_b.dcm_nb * self.bodies[b].states.c_b,
            })
        };
        let blocks =
            assemble_delassus(&frames, &points_a, &points_b, &inertia_a, inertia_b.as_ref());

        let (restitution, friction) = self.pair_coefficients.lookup(
            BodyId(a as u32),
            BodyId(b as u32),
            self.bodies[a].restitution,
            self.bodies[a].friction,
        );

        let solver = StrongeSolver::from_config(&SolverConfig {
            integration_step: self.config.collision_integration_step,
            ..SolverConfig::default()
        });
        let solution = solver.solve(&blocks, &frames, &initial_velocities, restitution, friction);
        self.telemetry.emit(ContactEvent::new(
            time,
            EventKind::ImpulseSolve {
                body_a: BodyId(a as u32),
                body_b: BodyId(b as u32),
                contact_count: manifold.len() as u32,
                iterations: solution.iterations,
                converged: solution.converged,
            },
        ));

        let mut force_n = DVec3::ZERO;
        let mut torque_b = DVec3::ZERO;
        let mut partner_impulse = DVec3::ZERO;
        let mut partner_torque_impulse = DVec3::ZERO;
        for (contact, impulse) in manifold.contacts().iter().zip(&solution.impulses_n) {
            force_n += *impulse / step;
            torque_b += cur_a.dcm_bn * (contact.point_a - cur_a.r_bn_n).cross(*impulse / step);
            partner_impulse -= *impulse;
            partner_torque_impulse -=
                cur_b.dcm_bn * (contact.point_b - cur_b.r_bn_n).cross(*impulse);
        }

        self.bodies[b].pending.push_back(PendingImpulse {
            impulse_n: partner_impulse,
            torque_impulse_b: partner_torque_impulse,
            time,
            step,
        });
        self.bodies[a].slot = SolutionSlot::Solved {
            force_n,
            torque_b,
            time_found: time + step + TIME_MATCH_TOL,
            step,
        };

        BodyForces {
            force_n,
            force_b: DVec3::ZERO,
            torque_b,
        }
    }

    /// Serves the partner body of a pair from its pending-impulse queue.
    fn deliver_partner(&mut self, pair_idx: usize, time: Scalar, step: Scalar) -> BodyForces {
        let b = self.close_pairs[pair_idx].b;

        let Some(front) = self.bodies[b].pending.front().copied() else {
            return BodyForces::zero();
        };

        if (time - front.time).abs() < self.config.time_synch_tol
            && (step - front.step).abs() < self.config.time_synch_tol
        {
            let force_n = front.impulse_n / step;
            let torque_b = front.torque_impulse_b / step;
            self.bodies[b].pending.pop_front();
            self.bodies[b].slot = SolutionSlot::Solved {
                force_n,
                torque_b,
                time_found: time + step + TIME_MATCH_TOL,
                step,
            };
            return BodyForces {
                force_n,
                force_b: DVec3::ZERO,
                torque_b,
            };
        }

        if time + step > front.time {
            // The integrator stepped past the queued impulse: push it
            // into rejecting and retrying with a smaller step.
            let (force_n, torque_b) = self.rejection_draw(step);
            self.bodies[b].slot = SolutionSlot::Rejected {
                force_n,
                torque_b,
                time_found: time + step + TIME_MATCH_TOL,
                step,
            };
            self.telemetry.emit(ContactEvent::new(
                time,
                EventKind::StepRejection {
                    body: BodyId(b as u32),
                    time,
                    step,
                },
            ));
            return BodyForces {
                force_n,
                force_b: DVec3::ZERO,
                torque_b,
            };
        }

        // The impulse lies beyond this sub-step; nothing to report yet.
        BodyForces::zero()
    }

    /// Runs the narrow phase for one close pair at the given poses.
    fn detect(
        &self,
        pair_idx: usize,
        cur_a: &BodyStates,
        fut_a: &BodyStates,
        cur_b: &BodyStates,
        fut_b: &BodyStates,
    ) -> Manifold {
        let pair = &self.close_pairs[pair_idx];
        let pose_a = Self::substep_sweep(cur_a, fut_a);
        let pose_b = Self::substep_sweep(cur_b, fut_b);
        let motion_a = Self::motion(cur_a);
        let motion_b = Self::motion(cur_b);

        let narrow = NarrowPhase {
            max_pos_error: self.config.max_pos_error,
        };
        narrow.detect(
            &NarrowInputs {
                mesh: &self.bodies[pair.a].mesh,
                clusters: &self.bodies[pair.a].clusters,
                pose: &pose_a,
                motion: &motion_a,
            },
            &NarrowInputs {
                mesh: &self.bodies[pair.b].mesh,
                clusters: &self.bodies[pair.b].clusters,
                pose: &pose_b,
                motion: &motion_b,
            },
            &pair.cluster_pairs,
        )
    }

    fn substep_sweep(cur: &BodyStates, fut: &BodyStates) -> SweptPose {
        SweptPose {
            r_now: cur.r_bn_n,
            r_next: fut.r_bn_n,
            dcm_nb_now: cur.dcm_nb,
            dcm_nb_next: fut.dcm_nb,
        }
    }

    fn motion(states: &BodyStates) -> BodyMotion {
        BodyMotion {
            r: states.r_bn_n,
            v: states.v_bn_n,
            dcm_nb: states.dcm_nb,
            omega_tilde_b: states.omega_tilde_b,
        }
    }

    /// One pseudo-random step-rejection draw: components uniform in
    /// [1000, 2000) divided by the sub-step.
    fn rejection_draw(&mut self, step: Scalar) -> (DVec3, DVec3) {
        let mut sample = || self.rng.gen_range(1000.0..2000.0) / step;
        let force = DVec3::new(sample(), sample(), sample());
        let torque = DVec3::new(sample(), sample(), sample());
        (force, torque)
    }
}
