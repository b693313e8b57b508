#[cfg(test)]
pub mod common;

#[cfg(test)]
mod test_resolve_turn;

#[cfg(test)]
mod test_charging_moves;

#[cfg(test)]
mod test_fainting;
