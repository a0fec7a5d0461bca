/// Numerical helpers: tapering windows, derivatives and smoothing, Fourier
/// analysis and peak search.
pub mod calculus;
pub mod peaks;
pub mod spectral;
pub mod window;
