pub mod lib_dem_newbies;

pub use lib_dem_newbies::LibDemNewbiesSnooper;
