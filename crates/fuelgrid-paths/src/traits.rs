use fuelgrid_core::Point;

/// Read-only view of a map that the fuel pathfinder searches.
///
/// Implementors must not change between the start and the end of a single
/// search; they may be edited freely between searches.
pub trait FuelMap {
    /// Whether `p` is in bounds and walkable.
    fn is_valid(&self, p: Point) -> bool;

    /// Where the vehicle starts, with a full tank.
    fn start(&self) -> Point;

    /// Where the vehicle must arrive.
    fn goal(&self) -> Point;

    /// Maximum fuel the vehicle carries; also the refill amount.
    fn fuel_capacity(&self) -> u32;

    /// Whether arriving at `p` resets the tank to [`fuel_capacity`](Self::fuel_capacity).
    fn is_fuel_station(&self, p: Point) -> bool;
}

impl<M: FuelMap + ?Sized> FuelMap for &M {
    fn is_valid(&self, p: Point) -> bool {
        (**self).is_valid(p)
    }

    fn start(&self) -> Point {
        (**self).start()
    }

    fn goal(&self) -> Point {
        (**self).goal()
    }

    fn fuel_capacity(&self) -> u32 {
        (**self).fuel_capacity()
    }

    fn is_fuel_station(&self, p: Point) -> bool {
        (**self).is_fuel_station(p)
    }
}
