use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::{SurfaceError, SurfaceResult};
use crate::surface::grid::HeightGrid;

#[derive(Debug, Clone, PartialEq)]
pub struct SampleRequest {
    pub label: String,
    pub expression: String,
    pub x_range: (f32, f32),
    pub x_samples: usize,
    pub z_range: (f32, f32),
    pub z_samples: usize,
}

pub enum SampleCommand {
    Sample(SampleRequest),
    Stop,
}

pub enum SampleResult {
    Keyframe { label: String, grid: HeightGrid },
    Error(String),
}

/// Parses `expression` (in `x` and `z`) into a height function.
pub fn compile_height_fn(expression: &str) -> SurfaceResult<impl Fn(f32, f32) -> f32> {
    let expr: meval::Expr = expression
        .parse()
        .map_err(|e: meval::Error| SurfaceError::Expression(e.to_string()))?;
    let f = expr
        .bind2("x", "z")
        .map_err(|e| SurfaceError::Expression(e.to_string()))?;
    Ok(move |x: f32, z: f32| f(x as f64, z as f64) as f32)
}

pub fn sample_request(request: &SampleRequest) -> SurfaceResult<HeightGrid> {
    let height_fn = compile_height_fn(&request.expression)?;
    HeightGrid::sample(
        height_fn,
        request.x_range,
        request.x_samples,
        request.z_range,
        request.z_samples,
    )
}

/// Samples keyframes off the frame thread.
///
/// Only grid generation happens on the worker. The finished grids come back
/// through [`KeyframeSampler::try_recv_result`] and are appended by the
/// caller, so the mesh engine itself stays single-threaded.
pub struct KeyframeSampler {
    tx_cmd: Sender<SampleCommand>,
    rx_result: Receiver<SampleResult>,
    last_error: Arc<Mutex<Option<String>>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl KeyframeSampler {
    pub fn new() -> Self {
        let (tx_cmd, rx_cmd) = channel::unbounded::<SampleCommand>();
        let (tx_result, rx_result) = channel::unbounded::<SampleResult>();
        let last_error = Arc::new(Mutex::new(None));
        let last_error_clone = Arc::clone(&last_error);

        let thread_handle = thread::Builder::new()
            .name("keyframe-sampler".into())
            .spawn(move || sampler_thread(rx_cmd, tx_result, last_error_clone))
            .ok();
        if thread_handle.is_none() {
            log::warn!("failed to spawn keyframe sampler thread");
        }

        Self {
            tx_cmd,
            rx_result,
            last_error,
            thread_handle,
        }
    }

    pub fn request(&self, request: SampleRequest) {
        let _ = self.tx_cmd.send(SampleCommand::Sample(request));
    }

    pub fn try_recv_result(&self) -> Option<SampleResult> {
        self.rx_result.try_recv().ok()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    pub fn stop(&self) {
        let _ = self.tx_cmd.send(SampleCommand::Stop);
    }
}

impl Default for KeyframeSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for KeyframeSampler {
    fn drop(&mut self) {
        let _ = self.tx_cmd.send(SampleCommand::Stop);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

fn sampler_thread(
    rx_cmd: Receiver<SampleCommand>,
    tx_result: Sender<SampleResult>,
    last_error: Arc<Mutex<Option<String>>>,
) {
    while let Ok(cmd) = rx_cmd.recv() {
        let request = match cmd {
            SampleCommand::Sample(request) => request,
            SampleCommand::Stop => return,
        };

        *last_error.lock() = None;
        let result = match sample_request(&request) {
            Ok(grid) => {
                log::debug!(
                    "sampled keyframe '{}' ({}x{})",
                    request.label,
                    grid.width(),
                    grid.depth()
                );
                SampleResult::Keyframe {
                    label: request.label,
                    grid,
                }
            }
            Err(e) => {
                let message = format!("{}: {}", request.label, e);
                log::warn!("keyframe sampling failed: {}", message);
                *last_error.lock() = Some(message.clone());
                SampleResult::Error(message)
            }
        };

        if tx_result.send(result).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn request(expression: &str, samples: usize) -> SampleRequest {
        SampleRequest {
            label: "test".into(),
            expression: expression.into(),
            x_range: (-1.0, 1.0),
            x_samples: samples,
            z_range: (0.0, 2.0),
            z_samples: samples,
        }
    }

    fn wait_for(sampler: &KeyframeSampler) -> SampleResult {
        for _ in 0..500 {
            if let Some(result) = sampler.try_recv_result() {
                return result;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        panic!("sampler produced nothing");
    }

    #[test]
    fn compiles_expressions_in_x_and_z() {
        let f = compile_height_fn("x * 2 + z").unwrap();
        assert_eq!(f(1.0, 3.0), 5.0);
    }

    #[test]
    fn unknown_variables_are_rejected() {
        assert!(matches!(
            compile_height_fn("x + y"),
            Err(SurfaceError::Expression(_))
        ));
        assert!(compile_height_fn("sin(").is_err());
    }

    #[test]
    fn worker_returns_grids() {
        let sampler = KeyframeSampler::new();
        sampler.request(request("x + z", 3));

        match wait_for(&sampler) {
            SampleResult::Keyframe { label, grid } => {
                assert_eq!(label, "test");
                assert_eq!(grid.dims(), (3, 3));
                assert_eq!(grid.get(2, 2).y, 3.0);
            }
            SampleResult::Error(e) => panic!("unexpected error {e}"),
        }
    }

    #[test]
    fn worker_reports_errors() {
        let sampler = KeyframeSampler::new();
        sampler.request(request("x +", 3));
        assert!(matches!(wait_for(&sampler), SampleResult::Error(_)));
        assert!(sampler.last_error().is_some());

        sampler.request(request("x", 1));
        assert!(matches!(wait_for(&sampler), SampleResult::Error(_)));
    }
}
