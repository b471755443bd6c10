mod estimator;
mod helper;
mod pricing;
mod weather;
